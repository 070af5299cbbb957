use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::LoginForm;
use crate::hooks::use_title;
use crate::{Route, State};

#[function_component]
pub fn LoginPage() -> Html {
    use_title("Sign in");
    let navigator = use_navigator();
    let (state, _) = use_store::<State>();

    // Redirect to the dashboard once a session exists
    {
        let navigator = navigator.clone();
        use_effect_with(state.is_authenticated(), move |is_auth| {
            if *is_auth && let Some(navigator) = navigator {
                navigator.push(&Route::Dashboard);
            }
        });
    }

    let on_success = Callback::from(move |_| {
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Dashboard);
        }
    });

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <LoginForm
                title="Sign in to RecallGuard"
                description="Enter your credentials to continue"
                on_success={on_success}
            />
        </div>
    }
}
