//! # Scanner Client — HTTP client for the external MCP scanner service
//!
//! Two operations mirror the service's API: `POST /api/scan` and
//! `POST /api/demo/attack`, plus a startup health probe. Each call is exactly
//! one network attempt; there is no retry or backoff. Every failure mode
//! (unreachable service, non-2xx status, malformed body, service-reported
//! error status) collapses into `ScanViewError::RequestFailed` — callers only
//! distinguish success from failure.

use crate::error::{ScanViewError, ScanViewResult};
use crate::report::{AttackReport, ScanReport};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

pub struct ScannerClient {
    http: reqwest::Client,
    base_url: String,
    total_requests: AtomicU64,
    total_failures: AtomicU64,
}

impl ScannerClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> ScanViewResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(concat!("mcp-scanview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScanViewError::RequestFailed(format!("HTTP client init: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            total_requests: AtomicU64::new(0),
            total_failures: AtomicU64::new(0),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn total_failures(&self) -> u64 {
        self.total_failures.load(Ordering::Relaxed)
    }

    /// Run a scan of the named configuration and return the parsed report.
    pub async fn scan(&self, config_path: &str) -> ScanViewResult<ScanReport> {
        debug!(config = %config_path, "Requesting scan");
        let report: ScanReport = self
            .post_json("/api/scan", serde_json::json!({ "config_path": config_path }))
            .await?;
        self.check_status(&report.status, report.message.as_deref())?;
        info!(
            config = %config_path,
            findings = report.results.len(),
            critical = report.summary.critical,
            high = report.summary.high,
            "Scan complete"
        );
        Ok(report)
    }

    /// Trigger the scripted attack demonstration.
    pub async fn attack_demo(&self) -> ScanViewResult<AttackReport> {
        debug!("Requesting attack demo");
        let report: AttackReport = self
            .post_json("/api/demo/attack", serde_json::json!({}))
            .await?;
        self.check_status(&report.status, report.message.as_deref())?;
        info!(steps = report.timeline.len(), "Attack demo complete");
        Ok(report)
    }

    /// Probe the service's health endpoint. Used once at startup for a
    /// reachability log line; failure is never fatal.
    pub async fn health(&self) -> ScanViewResult<()> {
        let url = format!("{}/api/health", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ScanViewError::RequestFailed(format!("Health check: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ScanViewError::RequestFailed(format!(
                "Health check returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> ScanViewResult<T> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.fail(format!("Request to {} failed: {}", path, e)))?;

        if !resp.status().is_success() {
            return Err(self.fail(format!("{} returned {}", path, resp.status())));
        }

        // Atomic: a body that does not parse discards the whole response.
        resp.json::<T>()
            .await
            .map_err(|e| self.fail(format!("Failed to parse {} response: {}", path, e)))
    }

    /// The service reports application-level failures inside a 2xx body as
    /// `{"status": "error", "message": ...}`. Treat those the same as any
    /// other request failure, for the scan and attack paths alike.
    fn check_status(&self, status: &str, message: Option<&str>) -> ScanViewResult<()> {
        if status == "success" {
            return Ok(());
        }
        Err(self.fail(format!(
            "Service reported '{}': {}",
            status,
            message.unwrap_or("no detail")
        )))
    }

    fn fail(&self, message: String) -> ScanViewError {
        self.total_failures.fetch_add(1, Ordering::Relaxed);
        warn!(error = %message, "Scanner service request failed");
        ScanViewError::RequestFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ScannerClient::new("http://localhost:8000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn non_success_status_maps_to_request_failed() {
        let client = ScannerClient::new("http://localhost:8000", 5).unwrap();

        assert!(client.check_status("success", None).is_ok());

        let err = client
            .check_status("error", Some("Failed to load config"))
            .unwrap_err();
        let ScanViewError::RequestFailed(msg) = err;
        assert!(msg.contains("Failed to load config"));
        assert_eq!(client.total_failures(), 1);
    }

    #[tokio::test]
    async fn unreachable_service_is_request_failed() {
        // Reserved TEST-NET-1 address: connection refused or timeout, never a server.
        let client = ScannerClient::new("http://192.0.2.1:1", 1).unwrap();
        let err = client.scan("configs/clean_config.json").await.unwrap_err();
        let ScanViewError::RequestFailed(_) = err;
        assert_eq!(client.total_requests(), 1);
        assert_eq!(client.total_failures(), 1);
    }
}
