use client_sync::preferences::{AlertSource, Channel};
use client_sync::{FetchState, PreferenceChange, PreferencesForm, forms};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::RequireAuth;
use crate::hooks::{PreferencesHook, use_preferences, use_title};

const IMMEDIATE: &str = "immediate";

#[function_component]
pub fn SettingsPage() -> Html {
    use_title("Notifications");

    html! {
        <div class="space-y-6 max-w-xl">
            <h1 class="text-3xl font-bold">{"Notifications"}</h1>
            <RequireAuth>
                <PreferencesEditor />
            </RequireAuth>
        </div>
    }
}

#[function_component]
fn PreferencesEditor() -> Html {
    let preferences = use_preferences();

    match &preferences.form {
        FetchState::NotFetched | FetchState::Loading => html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"Loading preferences..."}</p>
        },
        FetchState::Error(error) => html! {
            <p class="text-sm text-red-700 dark:text-red-400">
                {format!("Error loading preferences: {error}")}
            </p>
        },
        FetchState::Empty => html! {},
        FetchState::Loaded(form) => render_form(form, &preferences),
    }
}

fn toggle(label: &'static str, checked: bool, onchange: Callback<Event>) -> Html {
    html! {
        <label class="flex items-center gap-2">
            <input type="checkbox" {checked} {onchange} />
            <span>{label}</span>
        </label>
    }
}

fn render_form(form: &PreferencesForm, hook: &PreferencesHook) -> Html {
    let current = form.current();
    let dirty = form.is_dirty();

    let channels = Channel::ALL.into_iter().map(|channel| {
        let change = hook.change.clone();
        toggle(
            channel.label(),
            channel.enabled_in(current),
            Callback::from(move |_| change.emit(PreferenceChange::ToggleChannel(channel))),
        )
    });

    let sources = AlertSource::ALL.into_iter().map(|source| {
        let change = hook.change.clone();
        toggle(
            source.label(),
            source.enabled_in(current),
            Callback::from(move |_| change.emit(PreferenceChange::ToggleSource(source))),
        )
    });

    let on_timing = {
        let change = hook.change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let hour = select.value().parse::<u8>().ok();
            change.emit(PreferenceChange::DigestHour(hour));
        })
    };
    let selected_hour = current.digest_hour_utc;

    let on_save = {
        let save = hook.save.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            save.emit(());
        })
    };
    let on_reset = {
        let reset = hook.reset.clone();
        Callback::from(move |_: MouseEvent| reset.emit(()))
    };

    html! {
        <form onsubmit={on_save} class="space-y-6" aria-label="preferences-form">
            <fieldset class="space-y-2">
                <legend class="font-semibold mb-1">{"Channels"}</legend>
                {for channels}
            </fieldset>

            <fieldset class="space-y-2">
                <legend class="font-semibold mb-1">{"Sources"}</legend>
                {for sources}
            </fieldset>

            <div>
                <label class="font-semibold block mb-1" for="timing">{"Timing"}</label>
                <select id="timing" onchange={on_timing} class="px-3 py-2 border rounded-md bg-white dark:bg-neutral-700">
                    <option value={IMMEDIATE} selected={selected_hour.is_none()}>
                        {"Immediately"}
                    </option>
                    {for (0..24u8).map(|hour| html! {
                        <option value={hour.to_string()} selected={selected_hour == Some(hour)}>
                            {format!("Daily digest at {hour:02}:00 UTC")}
                        </option>
                    })}
                </select>
                if let Some(message) = hook.field_errors.get(forms::DIGEST_HOUR) {
                    <p class="mt-1 text-sm text-red-600 dark:text-red-400">{message}</p>
                }
            </div>

            <div class="flex gap-4 items-center">
                <button
                    type="submit"
                    disabled={!dirty || hook.is_saving}
                    class="px-4 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                >
                    {"Save"}
                </button>
                <button
                    type="button"
                    onclick={on_reset}
                    disabled={!dirty || hook.is_saving}
                    class="text-sm underline disabled:opacity-50"
                >
                    {"Reset"}
                </button>
                <span class="text-xs text-neutral-500">
                    {format!("Last saved {}", form.updated_at().strftime("%B %d, %Y %H:%M UTC"))}
                </span>
            </div>
        </form>
    }
}
