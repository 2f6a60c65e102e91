//! Shared helpers for eqviz server integration tests
//!
//! Every app is backed by the in-memory store and a temporary local upload
//! directory, so these tests need no external services.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use eqviz_server::{
    api::create_router,
    config::{Config, DatasetConfig},
    features::FeatureState,
    storage::Storage,
    store::MemoryStore,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "eqviz-test-boundary";

pub const SAMPLE_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,120.5,5.2,110
Valve-1,Valve,60,4.1,105.5
Pump-2,Pump,130,5.6,115
";

/// A router plus the pieces tests inspect directly
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: FeatureState,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_datasets(DatasetConfig::default())
    }

    pub fn with_retention(limit: usize) -> Self {
        Self::with_datasets(DatasetConfig {
            retention_limit: limit,
            ..DatasetConfig::default()
        })
    }

    pub fn with_datasets(datasets: DatasetConfig) -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let state = FeatureState::new(
            store.clone(),
            Storage::local(upload_dir.path()),
            datasets.clone(),
        );

        let config = Config {
            datasets,
            ..Config::default()
        };
        let router = create_router(state.clone(), &config);

        Self {
            router,
            store,
            state,
            upload_dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, body.to_vec())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// POST a multipart body to the upload endpoint
    pub async fn post_multipart(&self, body: Vec<u8>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/datasets/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn upload(&self, file_name: &str, content: &str) -> (StatusCode, Value) {
        self.post_multipart(multipart_file("file", file_name, content.as_bytes()))
            .await
    }

    /// Upload and return the new dataset id, panicking on any failure
    pub async fn upload_ok(&self, file_name: &str, content: &str) -> String {
        let (status, body) = self.upload(file_name, content).await;
        assert_eq!(status, StatusCode::CREATED, "upload failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

/// Single-part multipart/form-data body
pub fn multipart_file(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// CSV with `rows` pump readings
pub fn generated_csv(rows: usize) -> String {
    let mut csv = String::from("Equipment Name,Type,Flowrate,Pressure,Temperature\n");
    for i in 0..rows {
        csv.push_str(&format!("Unit-{},Pump,{}.5,4.0,100\n", i, i));
    }
    csv
}
