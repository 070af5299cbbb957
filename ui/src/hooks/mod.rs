pub mod use_auth;
pub mod use_collection;
pub mod use_fetch;
pub mod use_interval_refresh;
pub mod use_preferences;
pub mod use_recalls;
pub mod use_title;

pub use use_auth::{use_auth, use_logout};
pub use use_collection::{
    CollectionHook, use_collection, use_subscriptions, use_tracked_items,
};
pub use use_fetch::{FetchHookReturn, use_fetch};
pub use use_interval_refresh::{REFRESH_INTERVAL_MS, use_interval_refresh};
pub use use_preferences::{PreferencesHook, use_preferences};
pub use use_recalls::{use_recall_search, use_recent_recalls};
pub use use_title::use_title;
