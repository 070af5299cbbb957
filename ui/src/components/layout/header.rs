use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_logout;
use crate::{AuthState, Route, State};

const LINK_CLASSES: &str = "text-sm text-neutral-600 dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white";

#[function_component]
pub fn Header() -> Html {
    let (state, _) = use_store::<State>();
    let on_logout = use_logout();

    let session = match state.auth_state {
        AuthState::Unknown => html! {},
        AuthState::LoggedOut => html! {
            <Link<Route> to={Route::Login} classes={LINK_CLASSES}>
                {"Login"}
            </Link<Route>>
        },
        AuthState::LoggedIn => html! {
            <button onclick={on_logout} class={LINK_CLASSES} aria-label="Logout">
                {"Logout"}
            </button>
        },
    };

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <nav class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 flex justify-between items-center h-16">
                <Link<Route> to={Route::Dashboard} classes="text-xl font-semibold">
                    {"RecallGuard"}
                </Link<Route>>
                <div class="flex items-center space-x-4">
                    <Link<Route> to={Route::MyStuff} classes={LINK_CLASSES}>{"My Stuff"}</Link<Route>>
                    <Link<Route> to={Route::Subscriptions} classes={LINK_CLASSES}>{"Alerts"}</Link<Route>>
                    <Link<Route> to={Route::Scan} classes={LINK_CLASSES}>{"Scan"}</Link<Route>>
                    <Link<Route> to={Route::Settings} classes={LINK_CLASSES}>{"Settings"}</Link<Route>>
                    <Link<Route> to={Route::Billing} classes={LINK_CLASSES}>{"Billing"}</Link<Route>>
                    <Link<Route> to={Route::Transparency} classes={LINK_CLASSES}>{"Transparency"}</Link<Route>>
                    {session}
                </div>
            </nav>
        </header>
    }
}
