//! Comtrade HTTP adapter: one parameterized query per task, classified.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::domain::{FetchOutcome, FetchTask, TradeFlow};
use crate::ports::fetcher::TradeFetcher;

pub const DEFAULT_BASE_URL: &str = "https://comtradeapi.un.org/data/v1/get/C/A/HS";

/// Connect/read ceiling for a single query; a hung call must never eat the
/// whole run budget.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches one (year, partner) slice of annual HS records for a fixed
/// reporter and flow direction, authenticated by a subscription key.
///
/// No retries in here. The adapter reports what happened; the runner owns
/// pacing and the time budget.
pub struct ComtradeFetcher {
    http: Client,
    base_url: String,
    reporter_code: u32,
    flow: TradeFlow,
    api_key: String,
}

impl ComtradeFetcher {
    pub fn new(
        reporter_code: u32,
        flow: TradeFlow,
        api_key: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            reporter_code,
            flow,
            api_key: api_key.into(),
        })
    }

    /// Point the adapter at a different endpoint (stub servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, task: FetchTask) -> String {
        format!(
            "{}?cmdCode=all&period={}&reporterCode={}&partnerCode={}&flowCode={}&maxrecords=500&subscription-key={}",
            self.base_url,
            task.year,
            self.reporter_code,
            task.partner_code,
            self.flow.flow_code(),
            self.api_key,
        )
    }
}

/// Non-success statuses, classified. 403 is the quota signal and terminal
/// for the run; every other failure is worth retrying.
fn status_failure(status: StatusCode) -> Option<FetchOutcome> {
    if status == StatusCode::FORBIDDEN {
        Some(FetchOutcome::quota_exhausted(format!("HTTP {status}")))
    } else if !status.is_success() {
        Some(FetchOutcome::transient(format!("HTTP {status}")))
    } else {
        None
    }
}

/// The payload's `data` field carries the records; a missing or null field
/// is a legitimate empty answer, an undecodable body is not.
fn classify_payload(bytes: &[u8]) -> FetchOutcome {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(payload) => {
            let records = match payload.get("data") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            FetchOutcome::success(records)
        }
        Err(err) => FetchOutcome::transient(format!("payload decode: {err}")),
    }
}

#[async_trait]
impl TradeFetcher for ComtradeFetcher {
    async fn fetch(&self, task: FetchTask) -> FetchOutcome {
        let url = self.request_url(task);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => return FetchOutcome::transient(format!("request: {err}")),
        };

        if let Some(failure) = status_failure(response.status()) {
            return failure;
        }

        match response.bytes().await {
            Ok(bytes) => classify_payload(&bytes),
            Err(err) => FetchOutcome::transient(format!("body read: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn fetcher() -> ComtradeFetcher {
        ComtradeFetcher::new(842, TradeFlow::Imports, "secret-key").unwrap()
    }

    #[test]
    fn url_carries_every_query_parameter() {
        let url = fetcher().request_url(FetchTask::new(2020, 8));
        assert!(url.starts_with(DEFAULT_BASE_URL));
        assert!(url.contains("cmdCode=all"));
        assert!(url.contains("period=2020"));
        assert!(url.contains("reporterCode=842"));
        assert!(url.contains("partnerCode=8"));
        assert!(url.contains("flowCode=M"));
        assert!(url.contains("maxrecords=500"));
        assert!(url.contains("subscription-key=secret-key"));
    }

    #[test]
    fn exports_flow_switches_the_flow_code() {
        let fetcher = ComtradeFetcher::new(842, TradeFlow::Exports, "k").unwrap();
        assert!(fetcher.request_url(FetchTask::new(2020, 8)).contains("flowCode=X"));
    }

    #[rstest]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS)]
    #[case::bad_request(StatusCode::BAD_REQUEST)]
    fn non_quota_failures_are_transient(#[case] status: StatusCode) {
        assert!(matches!(
            status_failure(status),
            Some(FetchOutcome::TransientFailure(_))
        ));
    }

    #[test]
    fn forbidden_is_quota_exhaustion() {
        assert!(matches!(
            status_failure(StatusCode::FORBIDDEN),
            Some(FetchOutcome::QuotaExhausted(_))
        ));
        assert_eq!(status_failure(StatusCode::OK), None);
    }

    #[test]
    fn payload_data_field_becomes_the_record_list() {
        let body = json!({"data": [{"cmdCode": "01"}, {"cmdCode": "02"}]}).to_string();
        match classify_payload(body.as_bytes()) {
            FetchOutcome::Success(records) => assert_eq!(records.len(), 2),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[rstest]
    #[case::missing(json!({"count": 0}))]
    #[case::null(json!({"data": null}))]
    fn absent_data_is_an_empty_success(#[case] payload: Value) {
        let body = payload.to_string();
        assert_eq!(
            classify_payload(body.as_bytes()),
            FetchOutcome::success(vec![])
        );
    }

    #[test]
    fn garbage_body_is_transient() {
        assert!(matches!(
            classify_payload(b"<html>oops</html>"),
            FetchOutcome::TransientFailure(_)
        ));
    }
}
