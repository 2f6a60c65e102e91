//! Feature modules implementing the eqviz API
//!
//! Each feature is a vertical slice with its own commands, queries and routes.
//!
//! # Features
//!
//! - **datasets**: CSV upload, recent history, summaries and PDF reports
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate,
//! see [`crate::cqrs`].

pub mod datasets;

use axum::Router;
use std::sync::Arc;

use crate::config::DatasetConfig;
use crate::ingest::IngestPipeline;
use crate::report::{PdfReportRenderer, SharedRenderer};
use crate::storage::Storage;
use crate::store::SharedStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Dataset store (PostgreSQL or in-memory)
    pub store: SharedStore,
    /// Storage for the original uploaded files
    pub storage: Storage,
    pub pipeline: IngestPipeline,
    pub renderer: SharedRenderer,
    pub datasets: DatasetConfig,
}

impl FeatureState {
    /// State with the default PDF renderer
    pub fn new(store: SharedStore, storage: Storage, datasets: DatasetConfig) -> Self {
        Self::with_renderer(store, storage, datasets, Arc::new(PdfReportRenderer::new()))
    }

    pub fn with_renderer(
        store: SharedStore,
        storage: Storage,
        datasets: DatasetConfig,
        renderer: SharedRenderer,
    ) -> Self {
        let pipeline = IngestPipeline::new(store.clone(), storage.clone(), datasets.retention_limit);
        Self {
            store,
            storage,
            pipeline,
            renderer,
            datasets,
        }
    }
}

/// Creates the main API router with all feature routes mounted
///
/// - `/datasets` - Dataset upload, history, summary and report
pub fn router(state: FeatureState) -> Router<()> {
    let max_upload_bytes = state.datasets.max_upload_bytes;
    Router::new().nest(
        "/datasets",
        datasets::datasets_routes(max_upload_bytes).with_state(state),
    )
}
