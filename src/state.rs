use crate::{
    controllers::range::models::PeriodSummary,
    exchange::{ExchangeEntry, ExchangeLog, QueryId},
};

use std::collections::BTreeSet;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;

/// Everything the view renders. The log and the pending set only change
/// through [`Session`], so the log stays append-only.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    log:       ExchangeLog,
    pending:   BTreeSet<QueryId>,     // lookups dispatched but not resolved yet
    pub range: RangeState,
}

impl SessionState {
    pub fn log(&self) -> &ExchangeLog {
        &self.log
    }

    pub fn is_pending(&self, query: QueryId) -> bool {
        self.pending.contains(&query)
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RangeState {
    pub start:   Option<String>,
    pub end:     Option<String>,
    pub loading: bool,
    pub rows:    Vec<PeriodSummary>,
    pub error:   Option<String>,    // last failed range call, cleared on success
}

impl RangeState {
    // the search control is live only once both ends of the range are set
    pub fn can_search(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.start) && set(&self.end)
    }
}

/// Shared handle on the session state. Controllers mutate through it and
/// every mutation wakes the subscribers.
#[derive(Clone, Debug)]
pub struct Session {
    tx:       Arc<watch::Sender<SessionState>>,
    next_id:  Arc<AtomicU64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Session {
            tx:      Arc::new(tx),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.tx.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(f);
    }

    pub fn update_range(&self, f: impl FnOnce(&mut RangeState)) {
        self.update(|s| f(&mut s.range));
    }

    pub fn append(&self, entry: ExchangeEntry) {
        self.update(|s| s.log.append(entry));
    }

    /// Logs a request and marks its query as in flight.
    pub fn dispatch(&self, entry: ExchangeEntry) {
        self.update(|s| {
            s.pending.insert(entry.query);
            s.log.append(entry);
        });
    }

    /// Logs the outcome of a dispatched query and clears its in-flight mark.
    pub fn resolve(&self, entry: ExchangeEntry) {
        self.update(|s| {
            s.pending.remove(&entry.query);
            s.log.append(entry);
        });
    }

    pub fn next_query_id(&self) -> QueryId {
        QueryId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_see_appends() {
        let session = Session::new();
        let mut rx = session.subscribe();
        assert!(!rx.has_changed().unwrap());

        let id = session.next_query_id();
        session.append(ExchangeEntry::request(id, "k"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().log.len(), 1);
        assert_eq!(session.next_query_id(), QueryId(id.0 + 1));
    }

    #[test]
    fn dispatch_and_resolve_track_in_flight_queries() {
        let session = Session::new();
        let id = session.next_query_id();

        session.dispatch(ExchangeEntry::request(id, "k"));
        assert!(session.read(|s| s.is_pending(id)));
        assert_eq!(session.read(SessionState::in_flight), 1);

        session.resolve(ExchangeEntry::success(id, "k", "0x01"));
        assert!(!session.read(|s| s.is_pending(id)));
        assert_eq!(session.read(|s| s.log().len()), 2);
    }

    #[test]
    fn range_updates_leave_the_log_alone() {
        let session = Session::new();
        session.append(ExchangeEntry::request(session.next_query_id(), "k"));

        session.update_range(|r| r.loading = true);

        let state = session.snapshot();
        assert!(state.range.loading);
        assert_eq!(state.log().len(), 1);
    }

    #[test]
    fn search_needs_both_ends() {
        let mut range = RangeState::default();
        assert!(!range.can_search());
        range.start = Some("2020-01".into());
        assert!(!range.can_search());
        range.end = Some("  ".into());
        assert!(!range.can_search());
        range.end = Some("2020-03".into());
        assert!(range.can_search());
    }
}
