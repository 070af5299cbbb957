//! Fetch-and-mutate loaders for the user's own collections.

use std::marker::PhantomData;

use payloads::{
    APIClient, ClientError, Profile, Subscription, SubscriptionId,
    TrackedItem, TrackedItemId, requests,
};

use crate::{
    Collection, CollectionEvent, FieldErrors, Keyed, LoadTicket, SyncError,
    forms,
};

/// What the server handed back for a create.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<T> {
    /// The full entity; append it.
    Returned(T),
    /// Only an acknowledgement; refetch the list to see the entity.
    Refetch,
}

impl<T> CreateOutcome<T> {
    pub fn needs_refetch(&self) -> bool {
        matches!(self, CreateOutcome::Refetch)
    }
}

/// One family of endpoints backing a user-owned collection.
#[allow(async_fn_in_trait)]
pub trait Resource {
    type Item: Keyed + Clone + 'static;
    type Draft: Clone + 'static;

    /// Human readable name used in logs and messages.
    const NAME: &'static str;

    fn validate(draft: &Self::Draft) -> Result<(), FieldErrors>;

    async fn list(client: &APIClient) -> Result<Vec<Self::Item>, ClientError>;

    async fn create(
        client: &APIClient,
        draft: &Self::Draft,
    ) -> Result<CreateOutcome<Self::Item>, ClientError>;

    async fn delete(
        client: &APIClient,
        key: &<Self::Item as Keyed>::Key,
    ) -> Result<(), ClientError>;
}

/// `/api/subscriptions/`
pub struct Subscriptions;

impl Resource for Subscriptions {
    type Item = Subscription;
    type Draft = requests::NewSubscription;

    const NAME: &'static str = "subscriptions";

    fn validate(draft: &Self::Draft) -> Result<(), FieldErrors> {
        forms::validate_new_subscription(draft)
    }

    async fn list(client: &APIClient) -> Result<Vec<Subscription>, ClientError> {
        client.list_subscriptions().await
    }

    async fn create(
        client: &APIClient,
        draft: &Self::Draft,
    ) -> Result<CreateOutcome<Subscription>, ClientError> {
        let draft = requests::NewSubscription {
            recall_source: draft.recall_source.trim().to_string(),
            product_query: draft.product_query.trim().to_string(),
        };
        client
            .create_subscription(&draft)
            .await
            .map(CreateOutcome::Returned)
    }

    async fn delete(
        client: &APIClient,
        key: &SubscriptionId,
    ) -> Result<(), ClientError> {
        client.delete_subscription(key).await
    }
}

/// `/api/items`
pub struct TrackedItems;

impl Resource for TrackedItems {
    type Item = TrackedItem;
    type Draft = requests::NewTrackedItem;

    const NAME: &'static str = "tracked items";

    fn validate(draft: &Self::Draft) -> Result<(), FieldErrors> {
        forms::validate_new_item(draft)
    }

    async fn list(client: &APIClient) -> Result<Vec<TrackedItem>, ClientError> {
        client.list_items().await
    }

    async fn create(
        client: &APIClient,
        draft: &Self::Draft,
    ) -> Result<CreateOutcome<TrackedItem>, ClientError> {
        let draft = requests::NewTrackedItem {
            upc: draft.upc.trim().to_string(),
            label: draft
                .label
                .as_ref()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            profile: draft.profile,
        };
        client.create_item(&draft).await?;
        // the recall status is computed server side, so only a refetch
        // gives the real entity
        Ok(CreateOutcome::Refetch)
    }

    async fn delete(
        client: &APIClient,
        key: &TrackedItemId,
    ) -> Result<(), ClientError> {
        client.delete_item(key).await
    }
}

/// Tracked items per profile, in [`Profile::ALL`] order, keeping server
/// order inside each group. Profiles without items are left out.
pub fn group_by_profile(
    items: &[TrackedItem],
) -> Vec<(Profile, Vec<&TrackedItem>)> {
    Profile::ALL
        .into_iter()
        .map(|profile| {
            let group: Vec<_> =
                items.iter().filter(|i| i.profile == profile).collect();
            (profile, group)
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

/// Fetch the whole list for `R`. The error text is what the collection
/// records.
pub async fn fetch_list<R: Resource>(
    client: &APIClient,
) -> Result<Vec<R::Item>, SyncError> {
    match R::list(client).await {
        Ok(items) => {
            tracing::debug!("loaded {} {}", items.len(), R::NAME);
            Ok(items)
        }
        Err(e) => {
            tracing::warn!("loading {} failed: {e}", R::NAME);
            Err(e.into())
        }
    }
}

/// Validate and send a create. Invalid drafts never reach the network.
pub async fn submit_create<R: Resource>(
    client: &APIClient,
    draft: &R::Draft,
) -> Result<CreateOutcome<R::Item>, SyncError> {
    R::validate(draft).map_err(SyncError::Validation)?;
    R::create(client, draft).await.map_err(|e| {
        tracing::warn!("creating in {} failed: {e}", R::NAME);
        e.into()
    })
}

pub async fn submit_delete<R: Resource>(
    client: &APIClient,
    key: &<R::Item as Keyed>::Key,
) -> Result<(), SyncError> {
    R::delete(client, key).await.map_err(|e| {
        tracing::warn!("deleting {key:?} from {} failed: {e}", R::NAME);
        e.into()
    })
}

/// A collection bound to its endpoints.
///
/// Creates are applied once the server confirms them. Deletes come in two
/// flavours: [`CollectionSync::remove`] waits for the server, and
/// [`CollectionSync::remove_optimistic`] hides the entry at once and puts
/// it back if the request fails. Either way a failed request leaves the
/// collection exactly as it was before the call.
pub struct CollectionSync<R: Resource> {
    client: APIClient,
    collection: Collection<R::Item>,
    _resource: PhantomData<R>,
}

impl<R: Resource> CollectionSync<R> {
    pub fn new(client: APIClient) -> Self {
        Self {
            client,
            collection: Collection::new(),
            _resource: PhantomData,
        }
    }

    pub fn collection(&self) -> &Collection<R::Item> {
        &self.collection
    }

    pub fn items(&self) -> &[R::Item] {
        self.collection.items()
    }

    /// Fetch the whole collection. Errors are recorded in the collection
    /// state as well as returned.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let ticket = LoadTicket::next();
        self.collection.apply(CollectionEvent::BeginLoad(ticket));
        let (recorded, result) = match fetch_list::<R>(&self.client).await {
            Ok(items) => (Ok(items), Ok(())),
            Err(e) => (Err(e.to_string()), Err(e)),
        };
        self.collection
            .apply(CollectionEvent::FinishLoad(ticket, recorded));
        result
    }

    /// Validate and create, refetching when the server only acknowledges.
    pub async fn create(&mut self, draft: &R::Draft) -> Result<(), SyncError> {
        let outcome = submit_create::<R>(&self.client, draft).await?;
        let refetch = outcome.needs_refetch();
        self.collection.apply(CollectionEvent::Created(outcome));
        // the entity exists server side even if this refetch fails; the
        // failure shows up as a refresh error
        if refetch {
            if let Err(e) = self.load().await {
                tracing::warn!(
                    "created one of {} but could not refresh: {e}",
                    R::NAME
                );
            }
        }
        Ok(())
    }

    /// Delete on the server, then locally. The entry stays visible if the
    /// server refuses.
    pub async fn remove(
        &mut self,
        key: &<R::Item as Keyed>::Key,
    ) -> Result<(), SyncError> {
        submit_delete::<R>(&self.client, key).await?;
        self.collection.apply(CollectionEvent::Removed(key.clone()));
        Ok(())
    }

    /// Hide the entry immediately and restore it if the delete fails.
    pub async fn remove_optimistic(
        &mut self,
        key: &<R::Item as Keyed>::Key,
    ) -> Result<(), SyncError> {
        let Some(snapshot) = self.collection.remove_optimistic(key) else {
            return Err(SyncError::Missing(format!("{key:?}")));
        };
        if let Err(e) = submit_delete::<R>(&self.client, key).await {
            self.collection.restore(snapshot);
            return Err(e);
        }
        Ok(())
    }

    /// Drop all local state, e.g. after logout.
    pub fn clear(&mut self) {
        self.collection.apply(CollectionEvent::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::RecallStatus;

    fn item(id: i64, profile: Profile) -> TrackedItem {
        TrackedItem {
            id: TrackedItemId(id),
            upc: format!("{id:012}"),
            label: None,
            profile,
            status: RecallStatus::Safe,
            update_count: None,
        }
    }

    #[test]
    fn groups_in_profile_order_keeping_server_order() {
        let items = vec![
            item(1, Profile::Pet),
            item(2, Profile::Myself),
            item(3, Profile::Pet),
            item(4, Profile::Child),
        ];

        let groups = group_by_profile(&items);

        let shape: Vec<(Profile, Vec<i64>)> = groups
            .iter()
            .map(|(p, g)| (*p, g.iter().map(|i| i.id.0).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Profile::Myself, vec![2]),
                (Profile::Child, vec![4]),
                (Profile::Pet, vec![1, 3]),
            ]
        );
    }

    #[test]
    fn refetch_outcome_is_the_only_one_needing_a_list() {
        assert!(CreateOutcome::<TrackedItem>::Refetch.needs_refetch());
        assert!(
            !CreateOutcome::Returned(item(1, Profile::Other)).needs_refetch()
        );
    }
}
