use crate::{
    codec::HexCase,
    decode::decode,
    error::RpcError,
    exchange::{ExchangeEntry, QueryId},
    pb::kv::KvPair,
    state::Session,
    transport::KvClient,
};
use super::models::{QueryState, normalize_key};

use std::future::Future;
use tracing::{debug, info, warn};

/// Runs lookups against the key-value service and records every exchange.
///
/// Each `submit*` call logs its request synchronously and hands back a
/// future for the remote half. Several of those futures may be in flight at
/// once; each appends its result when it resolves, in resolution order.
pub struct LookupController<C> {
    client:   C,
    session:  Session,
    hex_case: HexCase,
}

impl<C: KvClient> LookupController<C> {
    pub fn new(client: C, session: Session) -> Self {
        LookupController { client, session, hex_case: HexCase::default() }
    }

    pub fn with_hex_case(mut self, hex_case: HexCase) -> Self {
        self.hex_case = hex_case;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Single key lookup. The request entry is in the log by the time this returns.
    pub fn submit(&self, input: &str) -> impl Future<Output = QueryState> + '_ {
        let key = normalize_key(input).to_string();
        let query = self.dispatch(&key);

        async move {
            let result = self.client
                .get(key.clone())
                .await
                .map(|resp| {
                    debug!(%query, len = resp.value.len(), "lookup payload received");
                    decode(&resp.value).render(self.hex_case)
                });
            self.resolve(query, key, result)
        }
    }

    /// Several keys in one call; each value is decoded on its own.
    pub fn submit_many<S: AsRef<str>>(&self, inputs: &[S]) -> impl Future<Output = QueryState> + '_ {
        let keys: Vec<String> = inputs
            .iter()
            .map(|k| normalize_key(k.as_ref()).to_string())
            .collect();
        let request_text = keys.join(", ");
        let query = self.dispatch(&request_text);

        async move {
            let result = self.client
                .get_many(keys.clone())
                .await
                .and_then(|resp| {
                    if resp.values.len() != keys.len() {
                        return Err(RpcError::Decode(format!(
                            "asked for {} keys, got {} values",
                            keys.len(),
                            resp.values.len()
                        )));
                    }
                    Ok(keys.iter()
                        .zip(resp.values.iter())
                        .map(|(k, v)| format!("{k} => {}", decode(v).render(self.hex_case)))
                        .collect::<Vec<_>>()
                        .join("\n"))
                });
            self.resolve(query, request_text, result)
        }
    }

    /// Every key under `prefix`, up to `limit` pairs (0 = server default).
    pub fn submit_prefix(&self, input: &str, limit: u64) -> impl Future<Output = QueryState> + '_ {
        let prefix = normalize_key(input).to_string();
        let request_text = with_limit(format!("prefix {prefix}"), limit);
        let query = self.dispatch(&request_text);

        async move {
            let result = self.client
                .get_by_prefix(prefix, limit)
                .await
                .map(|resp| self.render_pairs(&resp.key_values, resp.limit_reached));
            self.resolve(query, request_text, result)
        }
    }

    /// Keys from `begin` up to, not including, `end` (open-ended when `None`),
    /// at most `limit` pairs (0 = server default).
    pub fn submit_scan(&self, begin: &str, end: Option<&str>, limit: u64) -> impl Future<Output = QueryState> + '_ {
        let begin = normalize_key(begin).to_string();
        let end = end.map(|e| normalize_key(e).to_string());
        let request_text = with_limit(
            format!("scan {begin}..{}", end.as_deref().unwrap_or_default()),
            limit,
        );
        let query = self.dispatch(&request_text);

        async move {
            let result = self.client
                .scan(begin, end, limit)
                .await
                .map(|resp| self.render_pairs(&resp.key_values, resp.limit_reached));
            self.resolve(query, request_text, result)
        }
    }

    fn render_pairs(&self, pairs: &[KvPair], limit_reached: bool) -> String {
        let mut lines: Vec<String> = pairs
            .iter()
            .map(|p| format!("{} => {}", p.key, decode(&p.value).render(self.hex_case)))
            .collect();
        if lines.is_empty() {
            lines.push("(no keys)".to_string());
        }
        if limit_reached {
            lines.push("(limit reached)".to_string());
        }
        lines.join("\n")
    }

    fn dispatch(&self, request_text: &str) -> QueryId {
        let query = self.session.next_query_id();
        self.session.dispatch(ExchangeEntry::request(query, request_text));
        debug!(%query, request = request_text, "lookup dispatched");
        query
    }

    fn resolve(&self, query: QueryId, request_text: String, result: Result<String, RpcError>) -> QueryState {
        let (entry, state) = match result {
            Ok(text) => {
                info!(%query, "lookup succeeded");
                (ExchangeEntry::success(query, request_text, text), QueryState::Succeeded)
            }
            Err(err) => {
                warn!(%query, code = ?err.code(), error = %err, "lookup failed");
                (ExchangeEntry::error(query, request_text, err.render()), QueryState::Failed)
            }
        };
        self.session.resolve(entry);
        state
    }
}

fn with_limit(text: String, limit: u64) -> String {
    if limit == 0 {
        text
    } else {
        format!("{text} (limit {limit})")
    }
}
