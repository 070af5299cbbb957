use payloads::RecallRecord;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::MarkdownText;

#[derive(Properties, PartialEq)]
pub struct RecallDrawerProps {
    pub recall: RecallRecord,
    pub on_close: Callback<()>,
}

/// Side panel with the full notice for one recall.
#[function_component]
pub fn RecallDrawer(props: &RecallDrawerProps) -> Html {
    let recall = &props.recall;
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <aside
            class="fixed inset-y-0 right-0 z-40 w-full max-w-md bg-white dark:bg-neutral-800 shadow-xl p-6 overflow-y-auto"
            aria-label="recall-details"
        >
            <div class="flex justify-between items-start mb-4">
                <h2 class="text-xl font-semibold">{&recall.product}</h2>
                <button onclick={on_close} title="Close" class="text-neutral-400 hover:text-neutral-600">
                    {"×"}
                </button>
            </div>
            <dl class="text-sm space-y-1 mb-4">
                <div><dt class="inline font-medium">{"Hazard: "}</dt><dd class="inline">{&recall.hazard}</dd></div>
                <div><dt class="inline font-medium">{"Date: "}</dt><dd class="inline">{recall.recall_date.strftime("%B %d, %Y").to_string()}</dd></div>
                <div><dt class="inline font-medium">{"Source: "}</dt><dd class="inline">{recall.source.to_uppercase()}</dd></div>
            </dl>
            if let Some(description) = &recall.description {
                <MarkdownText text={description.clone()} />
            }
            <div class="flex gap-4 mt-4 text-sm font-medium">
                <Link<Route>
                    to={Route::Recall { source: recall.source.clone(), id: recall.id }}
                    classes="underline"
                >
                    {"Full details"}
                </Link<Route>>
                if let Some(url) = &recall.url {
                    <a
                        href={url.clone()}
                        target="_blank"
                        rel="noopener noreferrer"
                        class="underline"
                    >
                        {"Official notice"}
                    </a>
                }
            </div>
        </aside>
    }
}
