use crate::analytics::{self, SummaryError};
use crate::features::FeatureState;
use crate::store::StoreError;
use eqviz_common::types::Summary;
use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSummaryQuery {
    pub dataset_id: String,
}

pub type GetSummaryResponse = Summary;

#[derive(Debug, thiserror::Error)]
pub enum GetSummaryError {
    #[error("Invalid dataset id '{0}'")]
    InvalidId(String),
    #[error("Dataset not found")]
    NotFound,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<SummaryError> for GetSummaryError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::NotFound => Self::NotFound,
            SummaryError::Store(e) => Self::Store(e),
        }
    }
}

impl Request<Result<GetSummaryResponse, GetSummaryError>> for GetSummaryQuery {}

impl GetSummaryQuery {
    pub fn validate(&self) -> Result<Uuid, GetSummaryError> {
        Uuid::parse_str(self.dataset_id.trim())
            .map_err(|_| GetSummaryError::InvalidId(self.dataset_id.clone()))
    }
}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: GetSummaryQuery,
) -> Result<GetSummaryResponse, GetSummaryError> {
    let dataset_id = query.validate()?;
    Ok(analytics::summarize(state.store.as_ref(), dataset_id).await?)
}
