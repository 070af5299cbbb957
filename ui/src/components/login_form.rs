use client_sync::{FieldErrors, SyncError, forms, login_with_credentials};
use payloads::requests::LoginCredentials;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{auth_store, get_api_client};

const INPUT_CLASSES: &str = "w-full px-3 py-2 border border-neutral-300 dark:border-neutral-600 \
                             rounded-md shadow-sm bg-white dark:bg-neutral-700 \
                             text-neutral-900 dark:text-neutral-100 \
                             focus:outline-none focus:ring-2 focus:ring-neutral-500";

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub title: AttrValue,
    pub description: AttrValue,
    pub on_success: Callback<()>,
}

#[function_component]
pub fn LoginForm(props: &LoginFormProps) -> Html {
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let field_errors = use_state(FieldErrors::default);
    let error_message = use_state(|| None::<String>);
    let is_loading = use_state(|| false);

    let on_submit = {
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let field_errors = field_errors.clone();
        let error_message = error_message.clone();
        let is_loading = is_loading.clone();
        let on_success = props.on_success.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let value = |node: &NodeRef| {
                node.cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default()
            };
            let credentials =
                LoginCredentials::new(value(&email_ref), value(&password_ref));

            let field_errors = field_errors.clone();
            let error_message = error_message.clone();
            let is_loading = is_loading.clone();
            let on_success = on_success.clone();

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error_message.set(None);
                field_errors.set(FieldErrors::default());

                let result = login_with_credentials(
                    &get_api_client(),
                    &auth_store(),
                    &credentials,
                )
                .await;
                match result {
                    Ok(()) => on_success.emit(()),
                    Err(SyncError::Validation(errors)) => {
                        field_errors.set(errors)
                    }
                    Err(e) => error_message.set(Some(e.to_string())),
                }

                is_loading.set(false);
            });
        })
    };

    let field_error = |field: &str| match field_errors.get(field) {
        Some(message) => html! {
            <p class="mt-1 text-sm text-red-600 dark:text-red-400">{message}</p>
        },
        None => html! {},
    };

    html! {
        <div class="max-w-md w-full bg-white dark:bg-neutral-800 p-8 rounded-lg shadow-md">
            <div class="mb-8 text-center">
                <h1 class="text-2xl font-bold mb-2">{&props.title}</h1>
                <p class="text-neutral-600 dark:text-neutral-400">{&props.description}</p>
            </div>

            <form onsubmit={on_submit} class="space-y-6" aria-label="login-form">
                if let Some(error) = &*error_message {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                    </div>
                }

                <div>
                    <label for="email" class="block text-sm font-medium mb-2">{"Email"}</label>
                    <input
                        ref={email_ref}
                        type="email"
                        id="email"
                        autocomplete="email"
                        class={INPUT_CLASSES}
                        placeholder="you@example.com"
                    />
                    {field_error(forms::EMAIL)}
                </div>

                <div>
                    <label for="password" class="block text-sm font-medium mb-2">{"Password"}</label>
                    <input
                        ref={password_ref}
                        type="password"
                        id="password"
                        autocomplete="current-password"
                        class={INPUT_CLASSES}
                    />
                    {field_error(forms::PASSWORD)}
                </div>

                <button
                    type="submit"
                    disabled={*is_loading}
                    class="w-full bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 text-white px-4 py-2 rounded-md text-sm font-medium disabled:opacity-50"
                >
                    {if *is_loading { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
