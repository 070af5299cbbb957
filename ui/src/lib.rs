use std::sync::{Arc, OnceLock};

use client_sync::AuthStore;
use payloads::APIClient;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod contexts;
mod hooks;
pub mod logs;
mod pages;
mod state;
mod storage;

pub use state::{AuthState, State};

use components::layout::MainLayout;
use components::ToastContainer;
use contexts::toast::ToastProvider;
use pages::{
    BillingPage, DashboardPage, LoginPage, MyStuffPage, NotFoundPage,
    RecallDetailPage, ScanPage, SettingsPage, SubscriptionsPage,
    TransparencyPage,
};
use storage::BrowserStorage;

static AUTH_STORE: OnceLock<AuthStore> = OnceLock::new();

/// The session token store, restored from localStorage on first use.
pub fn auth_store() -> AuthStore {
    AUTH_STORE
        .get_or_init(|| AuthStore::restore(Arc::new(BrowserStorage)))
        .clone()
}

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> APIClient {
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .or_else(|| web_sys::window()?.location().origin().ok())
        .unwrap_or_default();

    APIClient::new(address).with_tokens(Arc::new(auth_store()))
}

#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/mystuff")]
    MyStuff,
    #[at("/subscriptions")]
    Subscriptions,
    #[at("/scan")]
    Scan,
    #[at("/recall/:source/:id")]
    Recall { source: String, id: i64 },
    #[at("/settings/notifications")]
    Settings,
    #[at("/settings/billing")]
    Billing,
    #[at("/transparency")]
    Transparency,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::MyStuff => html! { <MyStuffPage /> },
        Route::Subscriptions => html! { <SubscriptionsPage /> },
        Route::Scan => html! { <ScanPage /> },
        Route::Recall { source, id } => html! { <RecallDetailPage {source} {id} /> },
        Route::Settings => html! { <SettingsPage /> },
        Route::Billing => html! { <BillingPage /> },
        Route::Transparency => html! { <TransparencyPage /> },
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

#[function_component]
pub fn App() -> Html {
    html! {
        <BrowserRouter>
            <ToastProvider>
                <AuthSync />
                <MainLayout>
                    <Switch<Route> render={switch} />
                </MainLayout>
                <ToastContainer />
            </ToastProvider>
        </BrowserRouter>
    }
}

/// Mirrors the token store into global state for the lifetime of the app.
#[function_component]
fn AuthSync() -> Html {
    hooks::use_auth();
    html! {}
}
