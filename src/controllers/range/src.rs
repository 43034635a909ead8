use crate::{
    error::RpcError,
    pb::service::Month,
    state::Session,
    transport::BlockMetaClient,
};
use super::models::PeriodSummary;

use std::future::Future;
use tracing::{debug, info, warn};

/// Month-range search over the block-meta service. Holds no data of its own:
/// the selected range, loading flag and rows all live in the session.
pub struct RangeView<C> {
    client:  C,
    session: Session,
}

impl<C: BlockMetaClient> RangeView<C> {
    pub fn new(client: C, session: Session) -> Self {
        RangeView { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_start(&self, start: &str) {
        let start = non_empty(start);
        self.session.update_range(|r| r.start = start);
    }

    pub fn set_end(&self, end: &str) {
        let end = non_empty(end);
        self.session.update_range(|r| r.end = end);
    }

    pub fn can_search(&self) -> bool {
        self.session.read(|s| s.range.can_search())
    }

    /// Selects `start..=end` and runs the search. Returns whether a remote
    /// call was made; with either end empty nothing is sent.
    pub async fn search(&self, start: &str, end: &str) -> bool {
        self.set_start(start);
        self.set_end(end);
        self.run_search().await
    }

    /// Searches whatever range is currently selected.
    pub async fn run_search(&self) -> bool {
        let selected = self.session.read(|s| {
            s.range.can_search()
                .then(|| (s.range.start.clone(), s.range.end.clone()))
        });
        let Some((Some(start), Some(end))) = selected else {
            debug!("range search disabled until start and end are set");
            return false;
        };

        let what = format!("{start}..{end}");
        self.load(&what, self.client.get_block_info(start, end)).await;
        true
    }

    pub async fn month(&self, year: &str, month: &str) {
        let what = format!("{year}-{month}");
        let call = self.client.get_month(year.to_string(), month.to_string());
        self.load(&what, async move { call.await.map(|m| vec![m]) }).await;
    }

    pub async fn year(&self, year: &str) {
        self.load(year, self.client.get_year(year.to_string())).await;
    }

    // loading is raised before the call and lowered after it, whatever the outcome
    async fn load<F, M>(&self, what: &str, call: F)
    where
        F: Future<Output = Result<M, RpcError>>,
        M: IntoMonths,
    {
        self.session.update_range(|r| r.loading = true);
        debug!(range = what, "range query dispatched");

        let rows = call.await.and_then(|resp| {
            resp.into_months()
                .into_iter()
                .map(PeriodSummary::try_from)
                .collect::<anyhow::Result<Vec<_>>>()
                .map_err(|e| RpcError::Decode(format!("{e:#}")))
        });

        match rows {
            Ok(rows) => {
                info!(range = what, rows = rows.len(), "range query succeeded");
                self.session.update_range(|r| {
                    r.rows = rows;
                    r.error = None;
                    r.loading = false;
                });
            }
            Err(err) => {
                warn!(range = what, error = %err, "range query failed");
                self.session.update_range(|r| {
                    r.error = Some(err.render());
                    r.loading = false;
                });
            }
        }
    }
}

fn non_empty(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Response shapes that carry a list of months.
pub trait IntoMonths {
    fn into_months(self) -> Vec<Month>;
}

impl IntoMonths for Vec<Month> {
    fn into_months(self) -> Vec<Month> {
        self
    }
}

impl IntoMonths for crate::pb::service::Months {
    fn into_months(self) -> Vec<Month> {
        self.months
    }
}
