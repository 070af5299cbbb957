use std::rc::Rc;

use client_sync::{
    Collection, CollectionEvent, FieldErrors, Keyed, LoadTicket, Resource,
    Subscriptions, SyncError, TrackedItems, fetch_list, submit_create,
    submit_delete,
};
use payloads::APIClient;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::contexts::toast::use_toast;
use crate::{State, get_api_client};

type Key<R> = <<R as Resource>::Item as Keyed>::Key;

/// What a collection hook hands to its view.
pub struct CollectionHook<R: Resource> {
    pub collection: Collection<R::Item>,
    /// Messages from the last rejected create, keyed by form field.
    pub field_errors: FieldErrors,
    pub is_saving: bool,
    pub refetch: Callback<()>,
    /// Create `draft`; the second callback fires once the server accepted
    /// it, which is when forms should clear.
    pub create: Callback<(R::Draft, Callback<()>)>,
    /// Delete on the server, then locally.
    pub remove: Callback<Key<R>>,
}

struct CollectionStore<T>(Collection<T>);

impl<T> Default for CollectionStore<T> {
    fn default() -> Self {
        Self(Collection::default())
    }
}

impl<T: Keyed + Clone> Reducible for CollectionStore<T> {
    type Action = CollectionEvent<T>;

    fn reduce(self: Rc<Self>, event: Self::Action) -> Rc<Self> {
        let mut collection = self.0.clone();
        collection.apply(event);
        Rc::new(Self(collection))
    }
}

type StoreHandle<R> = UseReducerHandle<CollectionStore<<R as Resource>::Item>>;

async fn load<R: Resource>(client: &APIClient, store: &StoreHandle<R>) {
    let ticket = LoadTicket::next();
    store.dispatch(CollectionEvent::BeginLoad(ticket));
    let result = fetch_list::<R>(client).await.map_err(|e| e.to_string());
    store.dispatch(CollectionEvent::FinishLoad(ticket, result));
}

/// Fetch-and-mutate hook for one of the user's collections.
///
/// Loads on mount and whenever the session changes; logging out clears
/// the collection without a request. Creates are validated first and
/// applied only after the server accepted them; deletes likewise. A failed
/// mutation therefore never leaves anything to roll back, and is reported
/// through a toast.
#[hook]
pub fn use_collection<R>() -> CollectionHook<R>
where
    R: Resource + 'static,
    Key<R>: 'static,
{
    let (state, _) = use_store::<State>();
    let store = use_reducer(CollectionStore::<R::Item>::default);
    let field_errors = use_state(FieldErrors::default);
    let is_saving = use_state(|| false);
    let toast = use_toast();
    let authenticated = state.is_authenticated();

    let refetch = {
        let store = store.clone();
        use_callback(authenticated, move |_, authenticated| {
            if !*authenticated {
                store.dispatch(CollectionEvent::Clear);
                return;
            }
            let store = store.clone();
            yew::platform::spawn_local(async move {
                load::<R>(&get_api_client(), &store).await;
            });
        })
    };

    {
        let refetch = refetch.clone();
        use_effect_with(authenticated, move |_| refetch.emit(()));
    }

    let create = {
        let store = store.clone();
        let field_errors = field_errors.clone();
        let is_saving = is_saving.clone();
        let toast = toast.clone();

        Callback::from(move |(draft, on_created): (R::Draft, Callback<()>)| {
            field_errors.set(FieldErrors::default());

            let store = store.clone();
            let field_errors = field_errors.clone();
            let is_saving = is_saving.clone();
            let toast = toast.clone();
            yew::platform::spawn_local(async move {
                is_saving.set(true);
                let client = get_api_client();
                match submit_create::<R>(&client, &draft).await {
                    Ok(outcome) => {
                        let refetch = outcome.needs_refetch();
                        store.dispatch(CollectionEvent::Created(outcome));
                        on_created.emit(());
                        if refetch {
                            load::<R>(&client, &store).await;
                        }
                    }
                    Err(SyncError::Validation(errors)) => {
                        field_errors.set(errors)
                    }
                    Err(e) => toast.error(e.to_string()),
                }
                is_saving.set(false);
            });
        })
    };

    let remove = {
        let store = store.clone();

        Callback::from(move |key: Key<R>| {
            let store = store.clone();
            let toast = toast.clone();
            yew::platform::spawn_local(async move {
                match submit_delete::<R>(&get_api_client(), &key).await {
                    Ok(()) => store.dispatch(CollectionEvent::Removed(key)),
                    Err(e) => toast.error(format!("Could not delete: {e}")),
                }
            });
        })
    };

    CollectionHook {
        collection: store.0.clone(),
        field_errors: (*field_errors).clone(),
        is_saving: *is_saving,
        refetch,
        create,
        remove,
    }
}

#[hook]
pub fn use_subscriptions() -> CollectionHook<Subscriptions> {
    use_collection::<Subscriptions>()
}

#[hook]
pub fn use_tracked_items() -> CollectionHook<TrackedItems> {
    use_collection::<TrackedItems>()
}
