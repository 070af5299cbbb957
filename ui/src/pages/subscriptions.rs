use client_sync::{FetchState, forms};
use payloads::requests;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::hooks::{use_subscriptions, use_title};

/// Recall feeds a subscription can watch, as (wire value, label).
const SOURCES: [(&str, &str); 3] =
    [("cpsc", "CPSC"), ("fda", "FDA"), ("nhtsa", "NHTSA")];

#[function_component]
pub fn SubscriptionsPage() -> Html {
    use_title("Alerts");

    html! {
        <RequireAuth>
            <SubscriptionsPageInner />
        </RequireAuth>
    }
}

#[function_component]
fn SubscriptionsPageInner() -> Html {
    let subs = use_subscriptions();
    let source_ref = use_node_ref();
    let query_ref = use_node_ref();

    let on_submit = {
        let create = subs.create.clone();
        let source_ref = source_ref.clone();
        let query_ref = query_ref.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(source), Some(query)) = (
                source_ref.cast::<HtmlSelectElement>(),
                query_ref.cast::<HtmlInputElement>(),
            ) else {
                return;
            };

            let draft = requests::NewSubscription {
                recall_source: source.value(),
                product_query: query.value(),
            };
            let clear_form = Callback::from(move |_| query.set_value(""));
            create.emit((draft, clear_form));
        })
    };

    let field_error = |field: &str| match subs.field_errors.get(field) {
        Some(message) => html! {
            <p class="mt-1 text-sm text-red-600 dark:text-red-400">{message}</p>
        },
        None => html! {},
    };

    let list = match subs.collection.state() {
        FetchState::NotFetched | FetchState::Loading => html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"Loading alerts..."}</p>
        },
        FetchState::Error(error) => html! {
            <p class="text-sm text-red-700 dark:text-red-400">
                {format!("Error loading alerts: {error}")}
            </p>
        },
        FetchState::Empty => html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"No alerts yet"}</p>
        },
        FetchState::Loaded(loaded) => html! {
            <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                {for loaded.iter().map(|sub| {
                    let on_delete = {
                        let remove = subs.remove.clone();
                        let id = sub.id;
                        Callback::from(move |_: MouseEvent| remove.emit(id))
                    };
                    html! {
                        <li key={sub.id.to_string()} class="py-2 flex items-center justify-between">
                            <span>
                                <strong>{sub.recall_source.to_uppercase()}</strong>
                                {" - "}{&sub.product_query}
                            </span>
                            <button onclick={on_delete} class="text-sm underline">{"Delete"}</button>
                        </li>
                    }
                })}
            </ul>
        },
    };

    html! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">{"Recall alerts"}</h1>
                <p class="text-neutral-600 dark:text-neutral-400 mt-2">
                    {"Get notified when a new recall matches a product you care about"}
                </p>
            </div>

            <form onsubmit={on_submit} class="flex flex-wrap gap-2 items-start" aria-label="subscription-form">
                <div>
                    <select ref={source_ref} class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                        {for SOURCES.into_iter().map(|(value, label)| html! {
                            <option {value}>{label}</option>
                        })}
                    </select>
                    {field_error(forms::RECALL_SOURCE)}
                </div>
                <div>
                    <input ref={query_ref} placeholder="Product" class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700" />
                    {field_error(forms::PRODUCT_QUERY)}
                </div>
                <button
                    type="submit"
                    disabled={subs.is_saving}
                    class="px-4 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                >
                    {"Subscribe"}
                </button>
            </form>

            if let Some(error) = subs.collection.refresh_error() {
                <p class="text-sm text-amber-700 dark:text-amber-400">
                    {format!("Could not refresh: {error}")}
                </p>
            }

            {list}
        </div>
    }
}
