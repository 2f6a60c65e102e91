use crate::features::FeatureState;
use crate::store::StoreError;
use eqviz_common::types::DatasetInfo;
use mediator::Request;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: i64 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListHistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListHistoryResponse {
    pub datasets: Vec<DatasetInfo>,
    /// Limit actually applied after clamping
    pub limit: usize,
    pub retention_limit: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ListHistoryError {
    #[error("limit must be an integer")]
    InvalidLimit,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<ListHistoryResponse, ListHistoryError>> for ListHistoryQuery {}

impl ListHistoryQuery {
    /// Requested limit clamped to `1..=retention_limit`
    pub fn effective_limit(&self, retention_limit: usize) -> usize {
        let ceiling = retention_limit.max(1);
        let requested = self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(1);
        usize::try_from(requested).map_or(ceiling, |n| n.min(ceiling))
    }
}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: ListHistoryQuery,
) -> Result<ListHistoryResponse, ListHistoryError> {
    let retention_limit = state.datasets.retention_limit;
    let limit = query.effective_limit(retention_limit);

    // Concurrent uploads can briefly leave more than the retention limit in
    // the store; the limit here keeps the listing bounded regardless.
    let datasets = state
        .store
        .list_newest(Some(limit))
        .await?
        .iter()
        .map(|d| d.info())
        .collect();

    Ok(ListHistoryResponse {
        datasets,
        limit,
        retention_limit,
    })
}
