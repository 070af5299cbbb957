use client_sync::{FetchState, TransparencyReport};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{use_fetch, use_title};

const DATA_SOURCES: [&str; 3] = ["CPSC", "NHTSA", "FDA Enforcement Reports"];

#[function_component]
pub fn TransparencyPage() -> Html {
    use_title("Transparency");
    let report = use_fetch((), || async move {
        let report = TransparencyReport::fetch(&get_api_client()).await;
        Ok::<_, String>(FetchState::Loaded(report))
    });

    // the report itself never fails; until it arrives show placeholders
    let report = report.data.as_ref().cloned().unwrap_or_default();

    html! {
        <div class="space-y-6 max-w-xl">
            <h1 class="text-3xl font-bold">{"Transparency"}</h1>
            <section>
                <h2 class="text-lg font-semibold">{"Data sources"}</h2>
                <ul class="list-disc pl-5">
                    {for DATA_SOURCES.into_iter().map(|source| html! { <li>{source}</li> })}
                </ul>
            </section>
            <section>
                <h2 class="text-lg font-semibold">{"Uptime status"}</h2>
                <p>{report.status_text()}</p>
            </section>
            <section>
                <h2 class="text-lg font-semibold">{"Average ingest latency"}</h2>
                <p>{report.latency_text()}</p>
            </section>
        </div>
    }
}
