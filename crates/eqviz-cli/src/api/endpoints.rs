//! API endpoint URL builders
//!
//! Helper functions to construct API endpoint URLs.

use uuid::Uuid;

fn api_base(base_url: &str) -> String {
    format!("{}/api/v1/datasets", base_url.trim_end_matches('/'))
}

/// Build health check URL
pub fn health_url(base_url: &str) -> String {
    format!("{}/health", base_url.trim_end_matches('/'))
}

pub fn upload_url(base_url: &str) -> String {
    format!("{}/upload", api_base(base_url))
}

/// Build history URL, leaving the limit to the server default when `None`
pub fn history_url(base_url: &str, limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("{}/history?limit={}", api_base(base_url), limit),
        None => format!("{}/history", api_base(base_url)),
    }
}

pub fn summary_url(base_url: &str, id: Uuid) -> String {
    format!("{}/{}/summary", api_base(base_url), id)
}

pub fn report_url(base_url: &str, id: Uuid) -> String {
    format!("{}/{}/report", api_base(base_url), id)
}
