//! Client-side state for the recall API.
//!
//! Views never talk to the network directly: they hold a [`Collection`]
//! (or a [`FetchState`]) and drive it through the loaders here, which in
//! turn go through [`payloads::APIClient`]. Nothing in this crate touches
//! the DOM, so all of it runs in native tests.

pub mod auth;
pub mod collection;
pub mod fetch_state;
pub mod forms;
pub mod preferences;
pub mod recalls;
pub mod resource;
pub mod scan;
pub mod storage;
pub mod transparency;

pub use auth::{AuthStore, TOKEN_KEY, login_with_credentials};
pub use collection::{
    Collection, CollectionEvent, Keyed, LoadTicket, Snapshot,
};
pub use fetch_state::FetchState;
pub use forms::FieldErrors;
pub use preferences::{
    PreferenceChange, PreferencesForm, load_preferences, submit_preferences,
};
pub use recalls::RecallFeed;
pub use resource::{
    CollectionSync, CreateOutcome, Resource, Subscriptions, TrackedItems,
    fetch_list, group_by_profile, submit_create, submit_delete,
};
pub use scan::{RecentCache, ScanCache, ScanEntry, ScanOutcome, scan_code};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use transparency::TransparencyReport;

use payloads::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Client-side validation failed; nothing was sent.
    #[error("{0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("{0} is not in the collection")]
    Missing(String),
}

impl SyncError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SyncError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
