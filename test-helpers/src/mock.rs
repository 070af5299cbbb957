//! Realistic data for the dev server and integration tests.
//!
//! The recalls span the three regulator feeds the service ingests, with
//! overlapping ids across sources so views have to key on `(source, id)`.

use jiff::civil::{Date, date};
use payloads::{Profile, RecallRecord, requests};

use crate::{ALICE_EMAIL, ALICE_PASSWORD, MockStore};

fn recall(
    id: i64,
    source: &str,
    product: &str,
    hazard: &str,
    recall_date: Date,
) -> RecallRecord {
    RecallRecord {
        id,
        product: product.to_string(),
        hazard: hazard.to_string(),
        recall_date,
        source: source.to_string(),
        url: Some(format!("https://recalls.example.com/{source}/{id}")),
        description: None,
    }
}

/// Six recalls in no particular date order.
pub fn sample_recalls() -> Vec<RecallRecord> {
    vec![
        recall(
            1,
            "cpsc",
            "Electric Kettle",
            "Fire hazard",
            date(2025, 3, 4),
        ),
        RecallRecord {
            description: Some(
                "Units sold **January through March**.\n\n\
                 - Stop using the stroller\n- Contact the maker for a refund"
                    .into(),
            ),
            ..recall(
                2,
                "cpsc",
                "Folding Stroller",
                "Injury from hinge pinch",
                date(2025, 4, 18),
            )
        },
        recall(
            1,
            "fda",
            "Peanut Butter Crackers",
            "Salmonella",
            date(2025, 2, 11),
        ),
        recall(
            2,
            "fda",
            "Dog Food Kibble",
            "Chemical contamination",
            date(2025, 5, 2),
        ),
        recall(1, "nhtsa", "Child Car Seat", "Injury", date(2025, 1, 20)),
        recall(
            2,
            "nhtsa",
            "Space Heater",
            "Fire and burn hazard",
            date(2024, 12, 1),
        ),
    ]
}

/// Everything the dev server starts with.
pub struct DevDataset {
    pub recalls: usize,
    pub recalled_code: &'static str,
    pub safe_code: &'static str,
}

impl DevDataset {
    pub fn create(store: &MockStore) -> Self {
        let recalls = sample_recalls();
        let count = recalls.len();
        let kettle = recalls[0].clone();
        for recall in recalls {
            store.add_recall(recall);
        }

        store.add_user(ALICE_EMAIL, ALICE_PASSWORD);

        let recalled_code = "012345678905";
        let safe_code = "036000291452";
        store.link_code_to_recall(recalled_code, &kettle);
        store.add_remedy_update(
            &kettle.key(),
            "2025-03-04",
            "Recall announced. Stop using the kettle.",
        );
        store.add_remedy_update(
            &kettle.key(),
            "2025-04-10",
            "Replacement bases now shipping to registered owners.",
        );

        store.add_subscription(requests::NewSubscription {
            recall_source: "cpsc".into(),
            product_query: "Stroller".into(),
        });
        store.add_item(requests::NewTrackedItem {
            upc: recalled_code.into(),
            label: Some("Kitchen kettle".into()),
            profile: Profile::Myself,
        });
        store.add_item(requests::NewTrackedItem {
            upc: "0490001234".into(),
            label: Some("Kibble".into()),
            profile: Profile::Pet,
        });

        store.set_average_latency(Some(5.5 * 3600.0));

        Self {
            recalls: count,
            recalled_code,
            safe_code,
        }
    }

    pub fn print_summary(&self) {
        tracing::info!("📊 Seeded data:");
        tracing::info!("   {} recalls across cpsc, fda and nhtsa", self.recalls);
        tracing::info!("   login: {ALICE_EMAIL} / {ALICE_PASSWORD}");
        tracing::info!("   recalled code: {}", self.recalled_code);
        tracing::info!("   safe code:     {}", self.safe_code);
    }
}
