use crate::features::FeatureState;
use crate::ingest::{pipeline::display_name, IngestError, ParseError};
use eqviz_common::types::DatasetInfo;
use mediator::Request;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDatasetCommand {
    pub file_name: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

pub type UploadDatasetResponse = DatasetInfo;

#[derive(Debug, thiserror::Error)]
pub enum UploadDatasetError {
    #[error("No file field found in multipart data")]
    FileRequired,
    #[error("Filename is required and cannot be empty")]
    FilenameRequired,
    #[error("Filename must not exceed 255 characters")]
    FilenameLength,
    #[error("Filename must name a file")]
    FilenameInvalid,
    #[error("File content is required and cannot be empty")]
    ContentRequired,
    #[error("File exceeds the maximum upload size of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Invalid multipart request: {0}")]
    Multipart(String),
    #[error("Error parsing CSV: {0}")]
    Parse(ParseError),
    #[error("Ingestion failed: {0}")]
    Ingest(IngestError),
}

impl From<IngestError> for UploadDatasetError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Parse(e) => Self::Parse(e),
            other => Self::Ingest(other),
        }
    }
}

impl Request<Result<UploadDatasetResponse, UploadDatasetError>> for UploadDatasetCommand {}

impl UploadDatasetCommand {
    pub fn validate(&self) -> Result<(), UploadDatasetError> {
        if self.file_name.trim().is_empty() {
            return Err(UploadDatasetError::FilenameRequired);
        }
        if self.file_name.len() > 255 {
            return Err(UploadDatasetError::FilenameLength);
        }
        let name = display_name(&self.file_name);
        if name.is_empty() || name == "." || name == ".." {
            return Err(UploadDatasetError::FilenameInvalid);
        }
        if self.content.is_empty() {
            return Err(UploadDatasetError::ContentRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(state, command), fields(file_name = %command.file_name, size = command.content.len()))]
pub async fn handle(
    state: FeatureState,
    command: UploadDatasetCommand,
) -> Result<UploadDatasetResponse, UploadDatasetError> {
    command.validate()?;

    let limit = state.datasets.max_upload_bytes;
    if command.content.len() > limit {
        return Err(UploadDatasetError::TooLarge { limit });
    }

    let info = state
        .pipeline
        .ingest(command.content, &command.file_name)
        .await?;

    Ok(info)
}
