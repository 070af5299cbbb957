use client_sync::FetchState;
use client_sync::recalls::{format_update_time, load_detail};
use payloads::{RecallDetail, RecallKey};
use yew::prelude::*;

use crate::components::{MarkdownText, RequireAuth};
use crate::get_api_client;
use crate::hooks::{use_fetch, use_title};

#[derive(Properties, PartialEq)]
pub struct RecallDetailPageProps {
    pub source: String,
    pub id: i64,
}

#[function_component]
pub fn RecallDetailPage(props: &RecallDetailPageProps) -> Html {
    use_title("Recall");
    let key = RecallKey {
        source: props.source.clone(),
        id: props.id,
    };

    html! {
        <RequireAuth>
            <RecallDetailInner recall_key={key} />
        </RequireAuth>
    }
}

#[derive(Properties, PartialEq)]
struct RecallDetailInnerProps {
    recall_key: RecallKey,
}

#[function_component]
fn RecallDetailInner(props: &RecallDetailInnerProps) -> Html {
    let key = props.recall_key.clone();
    let detail = use_fetch(key.clone(), move || {
        let key = key.clone();
        async move {
            let detail = load_detail(&get_api_client(), &key)
                .await
                .map_err(|e| e.to_string())?;
            Ok::<_, String>(FetchState::Loaded(detail))
        }
    });

    detail.render("recall", "Recall not found", |detail, _, _| {
        render_detail(detail)
    })
}

fn render_detail(detail: &RecallDetail) -> Html {
    let recall = &detail.record;

    html! {
        <div class="space-y-6 max-w-2xl">
            <div>
                <h1 class="text-3xl font-bold">{&recall.product}</h1>
                <p class="text-neutral-600 dark:text-neutral-400 mt-2">
                    {&recall.hazard}{" · "}{recall.source.to_uppercase()}{" · "}
                    {recall.recall_date.strftime("%B %d, %Y").to_string()}
                </p>
            </div>

            if let Some(description) = &recall.description {
                <MarkdownText text={description.clone()} />
            }

            <section>
                <h2 class="text-lg font-semibold mb-2">{"Remedy updates"}</h2>
                if detail.remedy_updates.is_empty() {
                    <p class="text-neutral-600 dark:text-neutral-400">{"No updates yet"}</p>
                } else {
                    <ol aria-label="timeline" class="space-y-4">
                        {for detail.remedy_updates.iter().enumerate().map(|(i, update)| html! {
                            <li key={i} class="border-l-2 border-neutral-300 dark:border-neutral-600 ml-4 pl-4">
                                <div class="text-xs text-neutral-500">{format_update_time(&update.time)}</div>
                                <p>{&update.text}</p>
                            </li>
                        })}
                    </ol>
                }
            </section>

            if let Some(url) = &recall.url {
                <a
                    href={url.clone()}
                    target="_blank"
                    rel="noopener noreferrer"
                    class="inline-block text-sm font-medium underline"
                >
                    {"Official notice"}
                </a>
            }
        </div>
    }
}
