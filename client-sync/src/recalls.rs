use payloads::{APIClient, RecallDetail, RecallKey, RecallRecord};

use crate::{Collection, LoadTicket, SyncError};

/// How many recalls the dashboard asks for.
pub const DASHBOARD_LIMIT: u32 = 5000;

/// Read-only recall listings: the recent feed and search results.
pub struct RecallFeed {
    client: APIClient,
    recalls: Collection<RecallRecord>,
}

impl RecallFeed {
    pub fn new(client: APIClient) -> Self {
        Self {
            client,
            recalls: Collection::new(),
        }
    }

    pub fn recalls(&self) -> &Collection<RecallRecord> {
        &self.recalls
    }

    pub async fn load_recent(
        &mut self,
        limit: Option<u32>,
    ) -> Result<(), SyncError> {
        let ticket = LoadTicket::next();
        self.recalls.begin_load(ticket);
        let result = self.client.recent_recalls(limit).await;
        self.finish(ticket, result)
    }

    /// Search by free text. A blank query clears the results without a
    /// request.
    pub async fn search(&mut self, query: &str) -> Result<(), SyncError> {
        let query = query.trim();
        if query.is_empty() {
            self.recalls.replace(Vec::new());
            return Ok(());
        }
        let ticket = LoadTicket::next();
        self.recalls.begin_load(ticket);
        let result = self.client.search_recalls(query).await;
        self.finish(ticket, result)
    }

    fn finish(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RecallRecord>, payloads::ClientError>,
    ) -> Result<(), SyncError> {
        match result {
            Ok(recalls) => {
                tracing::debug!("loaded {} recalls", recalls.len());
                self.recalls.finish_load(ticket, Ok(recalls));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("loading recalls failed: {e}");
                self.recalls.finish_load(ticket, Err(e.to_string()));
                Err(e.into())
            }
        }
    }
}

/// A single recall with its remedy timeline.
pub async fn load_detail(
    client: &APIClient,
    key: &RecallKey,
) -> Result<RecallDetail, SyncError> {
    client.recall_detail(key).await.map_err(|e| {
        tracing::warn!("loading recall {key} failed: {e}");
        e.into()
    })
}

/// Label for a remedy update's `time`. ISO dates and timestamps read as
/// "March 04, 2025"; anything else is shown as published.
pub fn format_update_time(raw: &str) -> String {
    let raw = raw.trim();
    let date = raw
        .parse::<jiff::civil::Date>()
        .ok()
        .or_else(|| raw.parse::<jiff::civil::DateTime>().ok().map(|dt| dt.date()))
        .or_else(|| {
            raw.parse::<jiff::Timestamp>()
                .ok()
                .map(|ts| ts.to_zoned(jiff::tz::TimeZone::UTC).date())
        });
    match date {
        Some(date) => date.strftime("%B %d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Badge colour for a hazard description.
pub fn hazard_severity(hazard: &str) -> HazardSeverity {
    let hazard = hazard.to_lowercase();
    if hazard.contains("fire") {
        HazardSeverity::Fire
    } else if hazard.contains("injury") {
        HazardSeverity::Injury
    } else if hazard.contains("chemical") {
        HazardSeverity::Chemical
    } else {
        HazardSeverity::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardSeverity {
    Fire,
    Injury,
    Chemical,
    Other,
}

/// Case-insensitive match of a recall against a dashboard filter.
pub fn matches_filter(record: &RecallRecord, filter: &str) -> bool {
    let filter = filter.trim().to_lowercase();
    if filter.is_empty() {
        return true;
    }
    [&record.product, &record.hazard, &record.source]
        .iter()
        .any(|field| field.to_lowercase().contains(&filter))
        || record.recall_date.to_string().contains(&filter)
}
