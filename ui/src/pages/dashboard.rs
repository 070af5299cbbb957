use client_sync::recalls::{HazardSeverity, hazard_severity, matches_filter};
use payloads::{RecallKey, RecallRecord};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::RecallDrawer;
use crate::hooks::{
    FetchHookReturn, use_recall_search, use_recent_recalls, use_title,
};

fn severity_classes(hazard: &str) -> &'static str {
    match hazard_severity(hazard) {
        HazardSeverity::Fire => {
            "bg-red-100 text-red-800 dark:bg-red-900/40 dark:text-red-300"
        }
        HazardSeverity::Injury => {
            "bg-amber-100 text-amber-800 dark:bg-amber-900/40 dark:text-amber-300"
        }
        HazardSeverity::Chemical => {
            "bg-purple-100 text-purple-800 dark:bg-purple-900/40 dark:text-purple-300"
        }
        HazardSeverity::Other => {
            "bg-neutral-100 text-neutral-800 dark:bg-neutral-700 dark:text-neutral-200"
        }
    }
}

#[function_component]
pub fn DashboardPage() -> Html {
    use_title("Recalls");
    let recent = use_recent_recalls();
    let query = use_state(String::new);
    let search = use_recall_search((*query).clone());
    let filter = use_state(String::new);
    let selected = use_state(|| None::<RecallKey>);

    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter.set(input.value());
        })
    };

    let search_ref = use_node_ref();
    let on_search = {
        let query = query.clone();
        let search_ref = search_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(input) = search_ref.cast::<HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |key: RecallKey| selected.set(Some(key)))
    };
    let on_close = {
        let selected = selected.clone();
        Callback::from(move |_| selected.set(None))
    };

    // a submitted search replaces the recent feed until it is cleared
    let searching = !query.trim().is_empty();
    let shown: &FetchHookReturn<Vec<RecallRecord>> =
        if searching { &search } else { &recent };

    let drawer = (*selected).as_ref().and_then(|key| {
        shown
            .data
            .as_ref()?
            .iter()
            .find(|r| &r.key() == key)
            .cloned()
    });

    let table = shown.render(
        "recalls",
        if searching { "No recalls match your search" } else { "No recalls yet" },
        |recalls, is_loading, error| {
            let rows: Vec<_> = recalls
                .iter()
                .filter(|r| matches_filter(r, &filter))
                .collect();
            html! {
                <div class="space-y-2">
                    if is_loading {
                        <p class="text-xs text-neutral-500">{"Refreshing..."}</p>
                    }
                    if let Some(error) = error {
                        <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
                    }
                    <table class="min-w-full text-sm">
                        <thead>
                            <tr class="text-left border-b border-neutral-200 dark:border-neutral-700">
                                <th class="py-2">{"Product"}</th>
                                <th class="py-2">{"Hazard"}</th>
                                <th class="py-2">{"Date"}</th>
                                <th class="py-2">{"Source"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for rows.into_iter().map(|recall| {
                                let key = recall.key();
                                let onclick = {
                                    let on_select = on_select.clone();
                                    let key = key.clone();
                                    Callback::from(move |_: MouseEvent| on_select.emit(key.clone()))
                                };
                                html! {
                                    <tr key={key.to_string()} {onclick}
                                        class="border-b border-neutral-100 dark:border-neutral-800 cursor-pointer hover:bg-neutral-50 dark:hover:bg-neutral-800">
                                        <td class="py-2">{&recall.product}</td>
                                        <td class="py-2">
                                            <span class={classes!("px-2", "py-0.5", "rounded", "text-xs", severity_classes(&recall.hazard))}>
                                                {&recall.hazard}
                                            </span>
                                        </td>
                                        <td class="py-2">{recall.recall_date.to_string()}</td>
                                        <td class="py-2">{recall.source.to_uppercase()}</td>
                                    </tr>
                                }
                            })}
                        </tbody>
                    </table>
                </div>
            }
        },
    );

    html! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold">{"Recent recalls"}</h1>
                <p class="text-neutral-600 dark:text-neutral-400 mt-2">
                    {"Notices from CPSC, FDA and NHTSA, newest first"}
                </p>
            </div>

            <div class="flex flex-wrap gap-4">
                <input
                    type="text"
                    placeholder="Filter"
                    aria-label="filter"
                    oninput={on_filter}
                    class="px-3 py-2 border border-neutral-300 dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-700"
                />
                <form onsubmit={on_search} class="flex gap-2" aria-label="search-form">
                    <input
                        ref={search_ref}
                        type="search"
                        placeholder="Search all recalls"
                        class="px-3 py-2 border border-neutral-300 dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-700"
                    />
                    <button type="submit" class="px-4 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900">
                        {"Search"}
                    </button>
                </form>
            </div>

            {table}

            if let Some(recall) = drawer {
                <RecallDrawer recall={recall} on_close={on_close} />
            }
        </div>
    }
}
