use crate::{
    exchange::{Classification, QueryId},
    state::SessionState,
};

/// Lifecycle of one submitted lookup. `Succeeded` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryState {
    Pending,
    Succeeded,
    Failed,
}

// only a leading prefix is dropped; "ab0xcd" stays as typed
pub fn normalize_key(input: &str) -> &str {
    input.strip_prefix("0x").unwrap_or(input)
}

pub fn query_state(state: &SessionState, query: QueryId) -> Option<QueryState> {
    if state.is_pending(query) {
        return Some(QueryState::Pending);
    }
    state.log()
        .for_query(query)
        .filter_map(|e| match e.classification {
            Classification::Success => Some(QueryState::Succeeded),
            Classification::Error   => Some(QueryState::Failed),
            Classification::Request => None,
        })
        .last()
}
