use std::future::Future;

use payloads::ClientError;
use payloads::requests::Plan;
use payloads::responses::CheckoutSession;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::contexts::toast::{ToastHandle, use_toast};
use crate::hooks::use_title;
use crate::{State, get_api_client};

/// Ask the server for a hosted billing page and send the browser there.
/// `what` names the page in error toasts.
async fn redirect_to<F>(
    session: F,
    what: &'static str,
    toast: ToastHandle,
    is_redirecting: UseStateHandle<bool>,
) where
    F: Future<Output = Result<CheckoutSession, ClientError>>,
{
    is_redirecting.set(true);
    match session.await {
        Ok(session) => {
            let redirected = web_sys::window()
                .map(|w| w.location().set_href(&session.url));
            if !matches!(redirected, Some(Ok(()))) {
                tracing::error!("could not open the {what} page");
                toast.error(format!("Could not open the {what} page"));
                is_redirecting.set(false);
            }
        }
        Err(e) => {
            tracing::warn!("opening the {what} page failed: {e}");
            toast.error(format!("Could not open the {what} page: {e}"));
            is_redirecting.set(false);
        }
    }
}

#[function_component]
pub fn BillingPage() -> Html {
    use_title("Billing");
    let (state, _) = use_store::<State>();
    let toast = use_toast();
    let is_redirecting = use_state(|| false);

    let on_upgrade = {
        let toast = toast.clone();
        let is_redirecting = is_redirecting.clone();
        Callback::from(move |_: MouseEvent| {
            let toast = toast.clone();
            let is_redirecting = is_redirecting.clone();
            yew::platform::spawn_local(async move {
                let client = get_api_client();
                redirect_to(
                    client.checkout(Plan::Pro),
                    "checkout",
                    toast,
                    is_redirecting,
                )
                .await;
            });
        })
    };

    let on_manage = {
        let is_redirecting = is_redirecting.clone();
        Callback::from(move |_: MouseEvent| {
            let toast = toast.clone();
            let is_redirecting = is_redirecting.clone();
            yew::platform::spawn_local(async move {
                let client = get_api_client();
                redirect_to(
                    client.billing_portal(),
                    "subscription management",
                    toast,
                    is_redirecting,
                )
                .await;
            });
        })
    };

    html! {
        <div class="space-y-6 max-w-xl">
            <h1 class="text-3xl font-bold">{"Billing"}</h1>
            if state.is_authenticated() {
                <div class="flex flex-wrap gap-4 items-center">
                    <button
                        onclick={on_upgrade}
                        disabled={*is_redirecting}
                        class="px-4 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                    >
                        {"Upgrade to Pro"}
                    </button>
                    <button
                        onclick={on_manage}
                        disabled={*is_redirecting}
                        class="text-sm underline disabled:opacity-50"
                    >
                        {"Manage subscription"}
                    </button>
                </div>
            } else {
                <p class="text-neutral-600 dark:text-neutral-400">
                    {"Log in to upgrade or manage your plan"}
                </p>
            }
        </div>
    }
}
