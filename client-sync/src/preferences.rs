//! Notification settings, edited locally and saved as a whole.

use jiff::Timestamp;
use payloads::{APIClient, NotificationPreferences, responses::UserPreferences};

use crate::{SyncError, forms};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
    Push,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Email, Channel::Sms, Channel::Push];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Email => "Email alerts",
            Channel::Sms => "SMS alerts",
            Channel::Push => "Browser notifications",
        }
    }

    pub fn enabled_in(&self, preferences: &NotificationPreferences) -> bool {
        let channels = &preferences.channels;
        match self {
            Channel::Email => channels.email,
            Channel::Sms => channels.sms,
            Channel::Push => channels.push,
        }
    }

    fn flag<'a>(&self, preferences: &'a mut NotificationPreferences) -> &'a mut bool {
        let channels = &mut preferences.channels;
        match self {
            Channel::Email => &mut channels.email,
            Channel::Sms => &mut channels.sms,
            Channel::Push => &mut channels.push,
        }
    }
}

/// Regulator feeds a user can mute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSource {
    Cpsc,
    Fda,
    Usda,
    Nhtsa,
    Misc,
}

impl AlertSource {
    pub const ALL: [AlertSource; 5] = [
        AlertSource::Cpsc,
        AlertSource::Fda,
        AlertSource::Usda,
        AlertSource::Nhtsa,
        AlertSource::Misc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AlertSource::Cpsc => "CPSC",
            AlertSource::Fda => "FDA",
            AlertSource::Usda => "USDA",
            AlertSource::Nhtsa => "NHTSA",
            AlertSource::Misc => "Other sources",
        }
    }

    pub fn enabled_in(&self, preferences: &NotificationPreferences) -> bool {
        let sources = &preferences.sources;
        match self {
            AlertSource::Cpsc => sources.cpsc,
            AlertSource::Fda => sources.fda,
            AlertSource::Usda => sources.usda,
            AlertSource::Nhtsa => sources.nhtsa,
            AlertSource::Misc => sources.misc,
        }
    }

    fn flag<'a>(&self, preferences: &'a mut NotificationPreferences) -> &'a mut bool {
        let sources = &mut preferences.sources;
        match self {
            AlertSource::Cpsc => &mut sources.cpsc,
            AlertSource::Fda => &mut sources.fda,
            AlertSource::Usda => &mut sources.usda,
            AlertSource::Nhtsa => &mut sources.nhtsa,
            AlertSource::Misc => &mut sources.misc,
        }
    }
}

/// One edit made in the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    ToggleChannel(Channel),
    ToggleSource(AlertSource),
    /// `None` switches back to immediate alerts.
    DigestHour(Option<u8>),
}

impl PreferenceChange {
    pub fn apply_to(self, preferences: &mut NotificationPreferences) {
        match self {
            PreferenceChange::ToggleChannel(channel) => {
                let flag = channel.flag(preferences);
                *flag = !*flag;
            }
            PreferenceChange::ToggleSource(source) => {
                let flag = source.flag(preferences);
                *flag = !*flag;
            }
            PreferenceChange::DigestHour(hour) => {
                preferences.digest_hour_utc = hour;
            }
        }
    }
}

/// The settings as last saved, next to the ones being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesForm {
    saved: NotificationPreferences,
    current: NotificationPreferences,
    updated_at: Timestamp,
}

impl PreferencesForm {
    pub fn new(loaded: UserPreferences) -> Self {
        Self {
            current: loaded.preferences.clone(),
            saved: loaded.preferences,
            updated_at: loaded.updated_at,
        }
    }

    pub fn current(&self) -> &NotificationPreferences {
        &self.current
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// True when there is something to save or reset.
    pub fn is_dirty(&self) -> bool {
        self.current != self.saved
    }

    pub fn change(&mut self, change: PreferenceChange) {
        change.apply_to(&mut self.current);
    }

    /// Throw away unsaved edits.
    pub fn reset(&mut self) {
        self.current = self.saved.clone();
    }

    /// Record that `sent` was stored as `confirmed`. Edits made while the
    /// save was in flight stay in the form, still dirty.
    pub fn mark_saved(
        &mut self,
        sent: &NotificationPreferences,
        confirmed: UserPreferences,
    ) {
        if &self.current == sent {
            self.current = confirmed.preferences.clone();
        }
        self.saved = confirmed.preferences;
        self.updated_at = confirmed.updated_at;
    }
}

pub async fn load_preferences(
    client: &APIClient,
) -> Result<PreferencesForm, SyncError> {
    match client.preferences().await {
        Ok(loaded) => Ok(PreferencesForm::new(loaded)),
        Err(e) => {
            tracing::warn!("loading preferences failed: {e}");
            Err(e.into())
        }
    }
}

/// Validate and store `preferences`, returning them as the server saved
/// them. Invalid settings never reach the network.
pub async fn submit_preferences(
    client: &APIClient,
    preferences: &NotificationPreferences,
) -> Result<UserPreferences, SyncError> {
    forms::validate_preferences(preferences).map_err(SyncError::Validation)?;
    client.replace_preferences(preferences).await.map_err(|e| {
        tracing::warn!("saving preferences failed: {e}");
        e.into()
    })
}
