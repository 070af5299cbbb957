use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use payloads::{
    RecallKey, RecallRecord, Subscription, SubscriptionId, TrackedItem,
    TrackedItemId,
};

use crate::{CreateOutcome, FetchState};

/// An entity with a stable identity inside its collection.
pub trait Keyed {
    type Key: PartialEq + Clone + Debug;

    fn key(&self) -> Self::Key;
}

impl Keyed for Subscription {
    type Key = SubscriptionId;

    fn key(&self) -> SubscriptionId {
        self.id
    }
}

impl Keyed for TrackedItem {
    type Key = TrackedItemId;

    fn key(&self) -> TrackedItemId {
        self.id
    }
}

impl Keyed for RecallRecord {
    type Key = RecallKey;

    fn key(&self) -> RecallKey {
        RecallRecord::key(self)
    }
}

/// Identifies one list request. A collection only accepts the answer to
/// the newest request it started, and none after [`Collection::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Everything that can happen to a collection, in the order it happened.
#[derive(Debug, Clone)]
pub enum CollectionEvent<T: Keyed> {
    BeginLoad(LoadTicket),
    FinishLoad(LoadTicket, Result<Vec<T>, String>),
    /// The server accepted a create.
    Created(CreateOutcome<T>),
    /// The server accepted a delete.
    Removed(T::Key),
    /// The session ended; forget everything and ignore pending loads.
    Clear,
}

/// The state of a collection captured before a mutation, restored if the
/// mutation fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T>(FetchState<Vec<T>>);

/// A locally held list of server entities in server order.
///
/// A failed refresh keeps whatever was loaded before and records the
/// failure in [`Collection::refresh_error`]; only a failed first load puts
/// the collection into [`FetchState::Error`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    state: FetchState<Vec<T>>,
    pending: Option<LoadTicket>,
    refresh_error: Option<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            state: FetchState::NotFetched,
            pending: None,
            refresh_error: None,
        }
    }
}

impl<T: Keyed + Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            state: FetchState::from_items(items),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &FetchState<Vec<T>> {
        &self.state
    }

    /// Loaded entries, or an empty slice in any other state.
    pub fn items(&self) -> &[T] {
        self.state.as_ref().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// True while the first load is in flight or a refresh is running.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading() || self.pending.is_some()
    }

    pub fn refresh_error(&self) -> Option<&str> {
        self.refresh_error.as_deref()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items().iter().find(|item| &item.key() == key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.get(key).is_some()
    }

    /// Start the load identified by `ticket`, superseding any load still
    /// in flight.
    pub fn begin_load(&mut self, ticket: LoadTicket) {
        self.pending = Some(ticket);
        if !self.state.is_fetched() {
            self.state = FetchState::Loading;
        }
    }

    /// Apply the answer to `ticket`. Returns false, changing nothing, when
    /// a newer load was started or the collection was cleared meanwhile.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<T>, String>,
    ) -> bool {
        if self.pending != Some(ticket) {
            tracing::debug!("dropping stale load {ticket:?}");
            return false;
        }
        self.pending = None;
        match result {
            Ok(items) => {
                self.state = FetchState::from_items(items);
                self.refresh_error = None;
            }
            Err(e) if self.state.is_fetched() => {
                self.refresh_error = Some(e);
            }
            Err(e) => {
                self.state = FetchState::Error(e);
            }
        }
        true
    }

    pub fn apply(&mut self, event: CollectionEvent<T>) {
        match event {
            CollectionEvent::BeginLoad(ticket) => self.begin_load(ticket),
            CollectionEvent::FinishLoad(ticket, result) => {
                self.finish_load(ticket, result);
            }
            // a cleared or unloaded collection picks it up on its next load
            CollectionEvent::Created(CreateOutcome::Returned(item))
                if self.state.is_fetched() =>
            {
                self.push(item)
            }
            CollectionEvent::Created(CreateOutcome::Returned(_)) => {}
            // the list is refetched separately
            CollectionEvent::Created(CreateOutcome::Refetch) => {}
            CollectionEvent::Removed(key) => {
                self.remove(&key);
            }
            CollectionEvent::Clear => self.clear(),
        }
    }

    /// Replace the contents with server-confirmed entries.
    pub fn replace(&mut self, items: Vec<T>) {
        self.state = FetchState::from_items(items);
        self.refresh_error = None;
    }

    /// Forget everything, e.g. on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot(self.state.clone())
    }

    pub fn restore(&mut self, snapshot: Snapshot<T>) {
        self.state = snapshot.0;
    }

    /// Append an entry at the end, as the server does for new entities.
    pub fn push(&mut self, item: T) {
        match &mut self.state {
            FetchState::Loaded(items) => items.push(item),
            _ => self.state = FetchState::Loaded(vec![item]),
        }
    }

    /// Append before the server has confirmed, returning the snapshot to
    /// restore on failure.
    pub fn push_optimistic(&mut self, item: T) -> Snapshot<T> {
        let snapshot = self.snapshot();
        self.push(item);
        snapshot
    }

    /// Remove the entry with `key`, leaving the rest in order.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let FetchState::Loaded(items) = &mut self.state else {
            return None;
        };
        let index = items.iter().position(|item| &item.key() == key)?;
        let removed = items.remove(index);
        if items.is_empty() {
            self.state = FetchState::Empty;
        }
        Some(removed)
    }

    /// Remove before the server has confirmed. Returns `None`, changing
    /// nothing, if the key is not present.
    pub fn remove_optimistic(&mut self, key: &T::Key) -> Option<Snapshot<T>> {
        let snapshot = self.snapshot();
        self.remove(key).map(|_| snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u32, &'static str);

    impl Keyed for Row {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }
    }

    fn rows() -> Collection<Row> {
        Collection::from_items(vec![Row(1, "a"), Row(2, "b"), Row(3, "c")])
    }

    fn load(collection: &mut Collection<Row>, result: Result<Vec<Row>, String>) {
        let ticket = LoadTicket::next();
        collection.begin_load(ticket);
        assert!(collection.finish_load(ticket, result));
    }

    #[test]
    fn first_load_goes_through_loading() {
        let mut collection = Collection::<Row>::new();
        let ticket = LoadTicket::next();
        collection.begin_load(ticket);
        assert!(collection.state().is_loading());
        collection.finish_load(ticket, Ok(vec![Row(1, "a")]));
        assert_eq!(collection.items(), &[Row(1, "a")]);
        assert!(!collection.is_loading());
    }

    #[test]
    fn failed_first_load_is_an_error() {
        let mut collection = Collection::<Row>::new();
        load(&mut collection, Err("offline".into()));
        assert_eq!(collection.state().error(), Some("offline"));
        assert!(collection.is_empty());
    }

    #[test]
    fn failed_refresh_keeps_loaded_rows() {
        let mut collection = rows();
        let ticket = LoadTicket::next();
        collection.begin_load(ticket);
        assert!(collection.is_loading());
        assert_eq!(collection.len(), 3);

        collection.finish_load(ticket, Err("timeout".into()));
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.refresh_error(), Some("timeout"));

        load(&mut collection, Ok(vec![Row(9, "z")]));
        assert_eq!(collection.refresh_error(), None);
        assert_eq!(collection.items(), &[Row(9, "z")]);
    }

    #[test]
    fn remove_takes_only_the_matching_row() {
        let mut collection = rows();
        assert_eq!(collection.remove(&2), Some(Row(2, "b")));
        assert_eq!(collection.items(), &[Row(1, "a"), Row(3, "c")]);
        assert_eq!(collection.remove(&2), None);
    }

    #[test]
    fn removing_the_last_row_leaves_empty() {
        let mut collection = Collection::from_items(vec![Row(1, "a")]);
        collection.remove(&1);
        assert_eq!(collection.state(), &FetchState::Empty);
    }

    #[test]
    fn optimistic_remove_rolls_back_in_place() {
        let mut collection = rows();
        let snapshot = collection.remove_optimistic(&1).unwrap();
        assert_eq!(collection.len(), 2);
        collection.restore(snapshot);
        assert_eq!(collection, rows());

        assert!(collection.remove_optimistic(&42).is_none());
        assert_eq!(collection, rows());
    }

    #[test]
    fn optimistic_push_rolls_back() {
        let mut collection = Collection::<Row>::new();
        load(&mut collection, Ok(vec![]));
        let snapshot = collection.push_optimistic(Row(5, "e"));
        assert_eq!(collection.items(), &[Row(5, "e")]);
        collection.restore(snapshot);
        assert_eq!(collection.state(), &FetchState::Empty);
    }

    #[test]
    fn load_answered_after_logout_is_dropped() {
        let mut collection = rows();
        let ticket = LoadTicket::next();
        collection.apply(CollectionEvent::BeginLoad(ticket));
        collection.apply(CollectionEvent::Clear);
        collection.apply(CollectionEvent::FinishLoad(
            ticket,
            Ok(vec![Row(1, "a"), Row(2, "b")]),
        ));

        assert_eq!(collection.state(), &FetchState::NotFetched);
        assert!(collection.is_empty());
        assert!(!collection.is_loading());
    }

    #[test]
    fn older_load_cannot_overwrite_newer_one() {
        let mut collection = rows();
        let interval = LoadTicket::next();
        let after_create = LoadTicket::next();
        collection.begin_load(interval);
        collection.begin_load(after_create);

        assert!(collection.finish_load(
            after_create,
            Ok(vec![Row(1, "a"), Row(4, "d")])
        ));
        assert!(!collection.finish_load(interval, Ok(vec![Row(1, "a")])));

        assert_eq!(collection.items(), &[Row(1, "a"), Row(4, "d")]);
        assert!(!collection.is_loading());
    }

    #[test]
    fn confirmed_mutations_apply_in_place() {
        let mut collection = rows();
        collection.apply(CollectionEvent::Created(CreateOutcome::Returned(
            Row(4, "d"),
        )));
        collection.apply(CollectionEvent::Removed(2));
        collection.apply(CollectionEvent::Created(CreateOutcome::Refetch));

        assert_eq!(
            collection.items(),
            &[Row(1, "a"), Row(3, "c"), Row(4, "d")]
        );
    }

    #[test]
    fn create_confirmed_after_logout_is_not_shown() {
        let mut collection = rows();
        collection.apply(CollectionEvent::Clear);
        collection.apply(CollectionEvent::Created(CreateOutcome::Returned(
            Row(4, "d"),
        )));
        assert_eq!(collection.state(), &FetchState::NotFetched);
    }
}
