use client_sync::{RecallFeed, recalls::DASHBOARD_LIMIT};
use payloads::RecallRecord;
use yew::prelude::*;

use super::{FetchHookReturn, use_fetch};
use crate::get_api_client;

/// The dashboard feed, newest first.
#[hook]
pub fn use_recent_recalls() -> FetchHookReturn<Vec<RecallRecord>> {
    use_fetch((), || async move {
        let mut feed = RecallFeed::new(get_api_client());
        feed.load_recent(Some(DASHBOARD_LIMIT))
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>(feed.recalls().state().clone())
    })
}

/// Server-side search, re-run whenever `query` changes. A blank query is
/// `Empty` without a request.
#[hook]
pub fn use_recall_search(query: String) -> FetchHookReturn<Vec<RecallRecord>> {
    use_fetch(query.clone(), move || {
        let query = query.clone();
        async move {
            let mut feed = RecallFeed::new(get_api_client());
            feed.search(&query).await.map_err(|e| e.to_string())?;
            Ok::<_, String>(feed.recalls().state().clone())
        }
    })
}
