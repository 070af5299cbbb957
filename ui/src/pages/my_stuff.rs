use client_sync::{FetchState, forms, group_by_profile};
use payloads::{Profile, RecallStatus, requests};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::hooks::{
    REFRESH_INTERVAL_MS, use_interval_refresh, use_title, use_tracked_items,
};

fn remedy_updates_label(count: Option<u32>) -> String {
    match count {
        Some(1) => " · 1 remedy update".to_string(),
        Some(n) if n > 1 => format!(" · {n} remedy updates"),
        _ => String::new(),
    }
}

#[function_component]
pub fn MyStuffPage() -> Html {
    use_title("My Stuff");

    html! {
        <RequireAuth>
            <MyStuffPageInner />
        </RequireAuth>
    }
}

#[function_component]
fn MyStuffPageInner() -> Html {
    let items = use_tracked_items();
    use_interval_refresh(items.refetch.clone(), REFRESH_INTERVAL_MS);

    let upc_ref = use_node_ref();
    let label_ref = use_node_ref();
    let profile_ref = use_node_ref();

    let on_submit = {
        let create = items.create.clone();
        let upc_ref = upc_ref.clone();
        let label_ref = label_ref.clone();
        let profile_ref = profile_ref.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(upc), Some(label), Some(profile)) = (
                upc_ref.cast::<HtmlInputElement>(),
                label_ref.cast::<HtmlInputElement>(),
                profile_ref.cast::<HtmlSelectElement>(),
            ) else {
                return;
            };

            let draft = requests::NewTrackedItem {
                upc: upc.value(),
                label: Some(label.value()),
                profile: Profile::from_wire(&profile.value()).unwrap_or_default(),
            };
            let clear_form = Callback::from(move |_| {
                upc.set_value("");
                label.set_value("");
                profile.set_value(Profile::default().as_str());
            });
            create.emit((draft, clear_form));
        })
    };

    let list = match items.collection.state() {
        FetchState::NotFetched | FetchState::Loading => html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"Loading your items..."}</p>
        },
        FetchState::Error(error) => html! {
            <p class="text-sm text-red-700 dark:text-red-400">
                {format!("Error loading your items: {error}")}
            </p>
        },
        FetchState::Empty => html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"Nothing tracked yet. Add a product by its UPC above."}
            </p>
        },
        FetchState::Loaded(loaded) => html! {
            <div class="space-y-6">
                {for group_by_profile(loaded).into_iter().map(|(profile, group)| html! {
                    <section key={profile.as_str()}>
                        <h3 class="text-lg font-semibold mb-2">{profile.label()}</h3>
                        <ul class="space-y-2">
                            {for group.into_iter().map(|item| {
                                let on_delete = {
                                    let remove = items.remove.clone();
                                    let id = item.id;
                                    Callback::from(move |_: MouseEvent| remove.emit(id))
                                };
                                let status = match item.status {
                                    RecallStatus::Recalled => "⚠️ Recalled",
                                    RecallStatus::Safe => "✅ Safe",
                                };
                                let updates = remedy_updates_label(item.update_count);
                                html! {
                                    <li key={item.id.to_string()} class="flex items-center justify-between">
                                        <span>{item.display_name()}{" - "}{status}{updates}</span>
                                        <button onclick={on_delete} class="text-sm underline">{"Delete"}</button>
                                    </li>
                                }
                            })}
                        </ul>
                    </section>
                })}
            </div>
        },
    };

    html! {
        <div class="space-y-8">
            <h1 class="text-3xl font-bold">{"My Stuff"}</h1>

            <form onsubmit={on_submit} class="flex flex-wrap gap-2 items-start" aria-label="add-form">
                <div>
                    <input ref={upc_ref} placeholder="UPC" class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700" />
                    if let Some(message) = items.field_errors.get(forms::UPC) {
                        <p class="mt-1 text-sm text-red-600 dark:text-red-400">{message}</p>
                    }
                </div>
                <input ref={label_ref} placeholder="Label" class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700" />
                <select ref={profile_ref} class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                    {for Profile::ALL.into_iter().map(|profile| html! {
                        <option value={profile.as_str()}>{profile.label()}</option>
                    })}
                </select>
                <button
                    type="submit"
                    disabled={items.is_saving}
                    class="px-4 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                >
                    {"Add"}
                </button>
            </form>

            if let Some(error) = items.collection.refresh_error() {
                <p class="text-sm text-amber-700 dark:text-amber-400">
                    {format!("Could not refresh: {error}")}
                </p>
            }

            {list}
        </div>
    }
}
