use yew::prelude::*;
use yewdux::prelude::*;

use crate::components::LoginForm;
use crate::{AuthState, State};

/// Renders its children only with a session, so their hooks never fetch
/// anonymously. Shows the login form otherwise.
#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component]
pub fn RequireAuth(props: &RequireAuthProps) -> Html {
    let (state, _) = use_store::<State>();

    match state.auth_state {
        AuthState::Unknown => html! {
            <div class="text-center py-8">
                <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent"></div>
            </div>
        },
        AuthState::LoggedOut => html! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <LoginForm
                    title="Sign in to continue"
                    description="Please sign in to access this page"
                    on_success={Callback::noop()}
                />
            </div>
        },
        AuthState::LoggedIn => html! {
            <>{for props.children.iter()}</>
        },
    }
}
