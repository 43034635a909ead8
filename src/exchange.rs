//! Append-only record of what the operator asked and what came back.

use std::fmt;

/// Identifies one submitted query; shared by its request and result entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Request,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeEntry {
    pub query:          QueryId,
    pub request_text:   String,
    pub response_text:  String,     // empty on request entries
    pub classification: Classification,
}

impl ExchangeEntry {
    pub fn request(query: QueryId, request_text: impl Into<String>) -> Self {
        ExchangeEntry {
            query,
            request_text:   request_text.into(),
            response_text:  String::new(),
            classification: Classification::Request,
        }
    }

    pub fn success(query: QueryId, request_text: impl Into<String>, response_text: impl Into<String>) -> Self {
        ExchangeEntry {
            query,
            request_text:   request_text.into(),
            response_text:  response_text.into(),
            classification: Classification::Success,
        }
    }

    pub fn error(query: QueryId, request_text: impl Into<String>, response_text: impl Into<String>) -> Self {
        ExchangeEntry {
            query,
            request_text:   request_text.into(),
            response_text:  response_text.into(),
            classification: Classification::Error,
        }
    }
}

/// Entries are only ever pushed; there is no way to edit or drop one.
#[derive(Clone, Debug, Default)]
pub struct ExchangeLog {
    entries: Vec<ExchangeEntry>,
}

impl ExchangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ExchangeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ExchangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeEntry> {
        self.entries.iter()
    }

    // entries appended after the first `seen`
    pub fn since(&self, seen: usize) -> &[ExchangeEntry] {
        &self.entries[seen.min(self.entries.len())..]
    }

    pub fn for_query(&self, query: QueryId) -> impl Iterator<Item = &ExchangeEntry> {
        self.entries.iter().filter(move |e| e.query == query)
    }

    pub fn last_request(&self) -> Option<&ExchangeEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.classification == Classification::Request)
    }
}
