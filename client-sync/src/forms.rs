//! Client-side validation run before anything is sent.

use std::collections::BTreeMap;
use std::fmt;

use payloads::NotificationPreferences;
use payloads::requests::{
    self, LoginCredentials, NewSubscription, NewTrackedItem,
};

pub const UPC: &str = "upc";
pub const PRODUCT_QUERY: &str = "product_query";
pub const RECALL_SOURCE: &str = "recall_source";
pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";
pub const CODE: &str = "code";
pub const DIGEST_HOUR: &str = "digest_hour_utc";

/// Validation messages keyed by form field, shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.0.values() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

pub fn validate_new_item(item: &NewTrackedItem) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let upc = item.upc.trim();
    if upc.is_empty() {
        errors.add(UPC, "UPC required");
    } else if upc.len() > requests::UPC_MAX_LEN {
        errors.add(UPC, "UPC is too long");
    }
    errors.into_result()
}

pub fn validate_new_subscription(
    subscription: &NewSubscription,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let query = subscription.product_query.trim();
    if query.is_empty() {
        errors.add(PRODUCT_QUERY, "Product query required");
    } else if query.len() > requests::PRODUCT_QUERY_MAX_LEN {
        errors.add(PRODUCT_QUERY, "Product query is too long");
    }
    if subscription.recall_source.trim().is_empty() {
        errors.add(RECALL_SOURCE, "Choose a recall source");
    }
    errors.into_result()
}

pub fn validate_login(credentials: &LoginCredentials) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if credentials.email.trim().is_empty() {
        errors.add(EMAIL, "Email required");
    }
    if credentials.password_is_empty() {
        errors.add(PASSWORD, "Password required");
    }
    errors.into_result()
}

pub fn validate_code(code: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if code.trim().is_empty() {
        errors.add(CODE, "Enter or scan a code");
    }
    errors.into_result()
}

pub fn validate_preferences(
    preferences: &NotificationPreferences,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if preferences.digest_hour_utc.is_some_and(|hour| hour > 23) {
        errors.add(DIGEST_HOUR, "Digest hour must be between 0 and 23");
    }
    errors.into_result()
}
