use std::sync::Arc;

use client_sync::{ScanCache, ScanEntry, ScanOutcome, SyncError, forms, scan_code};
use payloads::RecallStatus;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::use_title;
use crate::storage::BrowserStorage;

fn scan_cache() -> ScanCache {
    ScanCache::recent_scans(Arc::new(BrowserStorage))
}

#[function_component]
pub fn ScanPage() -> Html {
    use_title("Scan");
    let code_ref = use_node_ref();
    let outcome = use_state(|| None::<ScanOutcome>);
    let error = use_state(|| None::<String>);
    let is_checking = use_state(|| false);
    let recent = use_state(|| scan_cache().load());

    let on_submit = {
        let code_ref = code_ref.clone();
        let outcome = outcome.clone();
        let error = error.clone();
        let is_checking = is_checking.clone();
        let recent = recent.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let code = code_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();

            let outcome = outcome.clone();
            let error = error.clone();
            let is_checking = is_checking.clone();
            let recent = recent.clone();
            yew::platform::spawn_local(async move {
                is_checking.set(true);
                error.set(None);
                outcome.set(None);

                let cache = scan_cache();
                match scan_code(&get_api_client(), &cache, &code).await {
                    Ok(result) => outcome.set(Some(result)),
                    Err(SyncError::Validation(errors)) => {
                        error.set(errors.get(forms::CODE).map(str::to_string))
                    }
                    Err(e) => {
                        tracing::warn!("scan failed: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                recent.set(cache.load());
                is_checking.set(false);
            });
        })
    };

    let result = match &*outcome {
        None => html! {},
        Some(outcome) => {
            let colors = if outcome.is_recalled() {
                "text-red-700 dark:text-red-400"
            } else {
                "text-green-700 dark:text-green-400"
            };
            let details = match outcome {
                ScanOutcome::Recalled { product_name, hazard, .. } => html! {
                    <p class="text-sm">
                        {product_name.clone().unwrap_or_default()}
                        if let Some(hazard) = hazard {
                            {" - "}{hazard}
                        }
                    </p>
                },
                ScanOutcome::Safe => html! {},
            };
            html! {
                <div class="p-4 rounded-md border border-neutral-200 dark:border-neutral-700 space-y-2" aria-label="scan-result">
                    <p class={classes!("text-lg", "font-semibold", colors)}>{outcome.indicator()}</p>
                    {details}
                    if let Some(url) = outcome.details_url() {
                        <a href={url.to_string()} target="_blank" rel="noopener noreferrer" class="text-sm underline">
                            {"View recall details"}
                        </a>
                    }
                </div>
            }
        }
    };

    html! {
        <div class="space-y-8 max-w-xl">
            <div>
                <h1 class="text-3xl font-bold">{"Scan a product"}</h1>
                <p class="text-neutral-600 dark:text-neutral-400 mt-2">
                    {"Enter the barcode number to check it against current recalls"}
                </p>
            </div>

            <form onsubmit={on_submit} class="flex gap-2" aria-label="scan-form">
                <input
                    ref={code_ref}
                    inputmode="numeric"
                    placeholder="UPC / barcode"
                    class="flex-1 px-3 py-2 border rounded-md bg-white dark:bg-neutral-700"
                />
                <button
                    type="submit"
                    disabled={*is_checking}
                    class="px-4 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                >
                    {if *is_checking { "Checking..." } else { "Check" }}
                </button>
            </form>

            if let Some(error) = &*error {
                <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
            }

            {result}

            if !recent.is_empty() {
                <section>
                    <h2 class="text-lg font-semibold mb-2">{"Recent scans"}</h2>
                    <ul class="text-sm space-y-1">
                        {for recent.iter().enumerate().map(|(i, entry)| recent_row(i, entry))}
                    </ul>
                </section>
            }
        </div>
    }
}

fn recent_row(index: usize, entry: &ScanEntry) -> Html {
    let status = match entry.result.status {
        RecallStatus::Recalled => "⚠️ Recalled",
        RecallStatus::Safe => "✅ Safe",
    };
    html! {
        <li key={index}>
            <span class="font-mono">{&entry.code}</span>{" - "}{status}
        </li>
    }
}
