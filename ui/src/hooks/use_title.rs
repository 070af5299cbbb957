use yew::prelude::*;

const APP_NAME: &str = "RecallGuard";

/// Sets the document title to "{page} · RecallGuard".
#[hook]
pub fn use_title(page: &str) {
    let title = format!("{page} · {APP_NAME}");
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}
