use std::rc::Rc;

use client_sync::{
    FetchState, FieldErrors, PreferenceChange, PreferencesForm, SyncError,
    load_preferences, submit_preferences,
};
use payloads::{NotificationPreferences, responses::UserPreferences};
use yew::prelude::*;

use crate::contexts::toast::use_toast;
use crate::get_api_client;

enum PreferencesAction {
    Loading,
    Loaded(Result<PreferencesForm, String>),
    Change(PreferenceChange),
    Reset,
    Saved {
        sent: NotificationPreferences,
        confirmed: UserPreferences,
    },
}

#[derive(Default)]
struct PreferencesStore(FetchState<PreferencesForm>);

impl Reducible for PreferencesStore {
    type Action = PreferencesAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = self.0.clone();
        match action {
            PreferencesAction::Loading => state = FetchState::Loading,
            PreferencesAction::Loaded(Ok(form)) => state = FetchState::Loaded(form),
            PreferencesAction::Loaded(Err(e)) => state = FetchState::Error(e),
            PreferencesAction::Change(change) => {
                if let FetchState::Loaded(form) = &mut state {
                    form.change(change);
                }
            }
            PreferencesAction::Reset => {
                if let FetchState::Loaded(form) = &mut state {
                    form.reset();
                }
            }
            PreferencesAction::Saved { sent, confirmed } => {
                if let FetchState::Loaded(form) = &mut state {
                    form.mark_saved(&sent, confirmed);
                }
            }
        }
        Rc::new(Self(state))
    }
}

pub struct PreferencesHook {
    pub form: FetchState<PreferencesForm>,
    pub field_errors: FieldErrors,
    pub is_saving: bool,
    pub change: Callback<PreferenceChange>,
    pub reset: Callback<()>,
    pub save: Callback<()>,
}

/// Loads the signed-in user's notification settings once and keeps the
/// unsaved edits. Mount it under `RequireAuth`.
#[hook]
pub fn use_preferences() -> PreferencesHook {
    let store = use_reducer(PreferencesStore::default);
    let field_errors = use_state(FieldErrors::default);
    let is_saving = use_state(|| false);
    let toast = use_toast();

    {
        let store = store.clone();
        use_effect_with((), move |_| {
            store.dispatch(PreferencesAction::Loading);
            yew::platform::spawn_local(async move {
                let loaded = load_preferences(&get_api_client())
                    .await
                    .map_err(|e| e.to_string());
                store.dispatch(PreferencesAction::Loaded(loaded));
            });
        });
    }

    let change = {
        let store = store.clone();
        Callback::from(move |change| store.dispatch(PreferencesAction::Change(change)))
    };

    let reset = {
        let store = store.clone();
        let field_errors = field_errors.clone();
        Callback::from(move |_| {
            field_errors.set(FieldErrors::default());
            store.dispatch(PreferencesAction::Reset);
        })
    };

    let save = {
        let store = store.clone();
        let field_errors = field_errors.clone();
        let is_saving = is_saving.clone();

        Callback::from(move |_| {
            let Some(form) = store.0.as_ref() else {
                return;
            };
            let sent = form.current().clone();
            field_errors.set(FieldErrors::default());

            let store = store.clone();
            let field_errors = field_errors.clone();
            let is_saving = is_saving.clone();
            let toast = toast.clone();
            yew::platform::spawn_local(async move {
                is_saving.set(true);
                match submit_preferences(&get_api_client(), &sent).await {
                    Ok(confirmed) => {
                        store.dispatch(PreferencesAction::Saved { sent, confirmed });
                        toast.success("Preferences saved");
                    }
                    Err(SyncError::Validation(errors)) => field_errors.set(errors),
                    Err(e) => toast.error(format!("Could not save preferences: {e}")),
                }
                is_saving.set(false);
            });
        })
    };

    PreferencesHook {
        form: store.0.clone(),
        field_errors: (*field_errors).clone(),
        is_saving: *is_saving,
        change,
        reset,
        save,
    }
}

#[cfg(test)]
mod tests {
    use client_sync::preferences::Channel;
    use jiff::Timestamp;

    use super::*;

    fn loaded() -> Rc<PreferencesStore> {
        let form = PreferencesForm::new(UserPreferences {
            id: 1,
            updated_at: Timestamp::UNIX_EPOCH,
            preferences: NotificationPreferences::default(),
        });
        Rc::new(PreferencesStore::default())
            .reduce(PreferencesAction::Loading)
            .reduce(PreferencesAction::Loaded(Ok(form)))
    }

    fn form(store: &PreferencesStore) -> &PreferencesForm {
        store.0.as_ref().unwrap()
    }

    #[test]
    fn edits_before_loading_are_ignored() {
        let store = Rc::new(PreferencesStore::default())
            .reduce(PreferencesAction::Change(PreferenceChange::DigestHour(Some(9))));
        assert_eq!(store.0, FetchState::NotFetched);
    }

    #[test]
    fn reset_undoes_toggles() {
        let store = loaded()
            .reduce(PreferencesAction::Change(PreferenceChange::ToggleChannel(Channel::Sms)));
        assert!(form(&store).is_dirty());

        let store = store.reduce(PreferencesAction::Reset);
        assert!(!form(&store).is_dirty());
    }

    #[test]
    fn saved_settings_become_the_baseline() {
        let store = loaded()
            .reduce(PreferencesAction::Change(PreferenceChange::DigestHour(Some(6))));
        let sent = form(&store).current().clone();
        let confirmed = UserPreferences {
            id: 1,
            updated_at: Timestamp::from_second(3600).unwrap(),
            preferences: sent.clone(),
        };

        let store = store.reduce(PreferencesAction::Saved { sent, confirmed });

        assert!(!form(&store).is_dirty());
        assert_eq!(form(&store).current().digest_hour_utc, Some(6));
    }
}
