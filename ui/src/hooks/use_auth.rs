use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::{Route, State, auth_store};

/// Keeps `State::auth_state` in step with the token store. Mount once, near
/// the root; every login or logout after that re-renders subscribers of
/// the global state.
#[hook]
pub fn use_auth() {
    let (_, dispatch) = use_store::<State>();

    use_effect_with((), move |_| {
        let mut tokens = auth_store().subscribe();
        let authenticated = tokens.borrow_and_update().is_some();
        dispatch.reduce_mut(|state| state.set_authenticated(authenticated));

        yew::platform::spawn_local(async move {
            // the sender lives as long as the app
            while tokens.changed().await.is_ok() {
                let authenticated = tokens.borrow_and_update().is_some();
                tracing::debug!(authenticated, "session changed");
                dispatch
                    .reduce_mut(|state| state.set_authenticated(authenticated));
            }
        });
    });
}

#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let navigator = use_navigator();

    Callback::from(move |_| {
        auth_store().logout();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Login);
        }
    })
}
