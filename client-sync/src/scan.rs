//! Barcode checks and the bounded recent-scan cache.

use std::marker::PhantomData;
use std::sync::Arc;

use payloads::{APIClient, RecallStatus, responses::CheckResult};
use serde::{Serialize, de::DeserializeOwned};

use crate::{KeyValueStorage, SyncError, forms};

pub const RECENT_SCANS_KEY: &str = "recentRecalls";
pub const RECENT_SCANS_CAPACITY: usize = 50;

/// What to show after a code is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Safe,
    Recalled {
        url: Option<String>,
        product_name: Option<String>,
        hazard: Option<String>,
    },
}

impl ScanOutcome {
    pub fn is_recalled(&self) -> bool {
        matches!(self, ScanOutcome::Recalled { .. })
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            ScanOutcome::Safe => "✅ Safe – No recalls found",
            ScanOutcome::Recalled { .. } => "⚠️ Recalled",
        }
    }

    /// Link to the official notice, only for recalled products.
    pub fn details_url(&self) -> Option<&str> {
        match self {
            ScanOutcome::Recalled { url, .. } => {
                url.as_deref().filter(|u| !u.is_empty())
            }
            ScanOutcome::Safe => None,
        }
    }
}

impl From<CheckResult> for ScanOutcome {
    fn from(result: CheckResult) -> Self {
        match result.status {
            RecallStatus::Safe => ScanOutcome::Safe,
            RecallStatus::Recalled => ScanOutcome::Recalled {
                url: result.url,
                product_name: result.product_name,
                hazard: result.hazard,
            },
        }
    }
}

/// A remembered scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ScanEntry {
    pub code: String,
    pub result: CheckResult,
}

/// Newest-first list persisted under a fixed key, silently truncated at
/// capacity. Read and write failures are logged and otherwise ignored.
pub struct RecentCache<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: &'static str,
    capacity: usize,
    _entry: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> RecentCache<T> {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        key: &'static str,
        capacity: usize,
    ) -> Self {
        Self {
            storage,
            key,
            capacity,
            _entry: PhantomData,
        }
    }

    /// Cached entries, newest first; `[]` if nothing usable is stored.
    pub fn load(&self) -> Vec<T> {
        let raw = match self.storage.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("could not read {}: {e}", self.key);
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("discarding unreadable {}: {e}", self.key);
            Vec::new()
        })
    }

    /// Put `entries` (already newest first) in front of what is cached.
    pub fn record(&self, entries: Vec<T>) {
        let mut combined = entries;
        combined.extend(self.load());
        combined.truncate(self.capacity);

        let raw = match serde_json::to_string(&combined) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("could not encode {}: {e}", self.key);
                return;
            }
        };
        if let Err(e) = self.storage.set(self.key, &raw) {
            tracing::warn!("could not save {}: {e}", self.key);
        }
    }
}

pub type ScanCache = RecentCache<ScanEntry>;

impl ScanCache {
    pub fn recent_scans(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(storage, RECENT_SCANS_KEY, RECENT_SCANS_CAPACITY)
    }
}

/// Check a scanned or typed code and remember the answer.
pub async fn scan_code(
    client: &APIClient,
    cache: &ScanCache,
    code: &str,
) -> Result<ScanOutcome, SyncError> {
    forms::validate_code(code).map_err(SyncError::Validation)?;
    let code = code.trim();
    let result = client.check_code(code).await?;
    tracing::debug!(code, status = %result.status, "checked code");
    cache.record(vec![ScanEntry {
        code: code.to_string(),
        result: result.clone(),
    }]);
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    fn safe(code: &str) -> ScanEntry {
        ScanEntry {
            code: code.to_string(),
            result: CheckResult {
                status: RecallStatus::Safe,
                recall_id: None,
                product_name: None,
                hazard: None,
                url: None,
            },
        }
    }

    #[test]
    fn recalled_result_links_to_notice() {
        let outcome = ScanOutcome::from(CheckResult {
            status: RecallStatus::Recalled,
            recall_id: Some(3),
            product_name: Some("Crib".into()),
            hazard: Some("Fall".into()),
            url: Some("https://example.com/r/3".into()),
        });
        assert!(outcome.is_recalled());
        assert_eq!(outcome.details_url(), Some("https://example.com/r/3"));
        assert_eq!(ScanOutcome::Safe.details_url(), None);
    }

    #[test]
    fn cache_is_newest_first_and_bounded() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = ScanCache::recent_scans(storage);
        for i in 0..60 {
            cache.record(vec![safe(&i.to_string())]);
        }
        let entries = cache.load();
        assert_eq!(entries.len(), RECENT_SCANS_CAPACITY);
        assert_eq!(entries[0].code, "59");
        assert_eq!(entries[49].code, "10");
    }

    #[test]
    fn corrupt_cache_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(RECENT_SCANS_KEY, "{not json").unwrap();
        let cache = ScanCache::recent_scans(storage);
        assert!(cache.load().is_empty());
        cache.record(vec![safe("1")]);
        assert_eq!(cache.load(), vec![safe("1")]);
    }
}
