//! Blocking fetch of the upstream sessions endpoint.
//!
//! One call performs a single GET, decodes the [`SessionsEnvelope`] and
//! aggregates it into a [`MetricSet`]. Nothing is retried here; the agent
//! invokes the probe again on its next interval.

use std::time::Duration;

use api_types::SessionsEnvelope;
use reqwest::blocking::Client as BlockingClient;
use reqwest::StatusCode;
use thiserror::Error;

use crate::metrics::aggregate;
use crate::metrics::MetricSet;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream responded with {0}")]
    Status(StatusCode),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("failed to decode sessions payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce one cycle of probe metrics
pub trait MetricsSource {
    fn fetch_metrics(&self) -> Result<MetricSet, FetchError>;
}

/// Configuration for [`SessionFetcher`]
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub url: String,
    /// `None` waits on the upstream indefinitely
    pub timeout: Option<Duration>,
}

pub struct SessionFetcher {
    config: FetcherConfig,
    client: BlockingClient,
}

impl SessionFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = BlockingClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// GET and decode the envelope without aggregating it.
    pub fn fetch_sessions(&self) -> Result<SessionsEnvelope, FetchError> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .map_err(|source| FetchError::Request {
                url: self.config.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().map_err(FetchError::Body)?;
        let envelope: SessionsEnvelope = serde_json::from_slice(&body)?;

        tracing::debug!(
            url = %self.config.url,
            status_code = ?envelope.status_code,
            sessions = envelope.data.len(),
            "fetched sessions"
        );
        Ok(envelope)
    }
}

impl MetricsSource for SessionFetcher {
    fn fetch_metrics(&self) -> Result<MetricSet, FetchError> {
        let envelope = self.fetch_sessions()?;
        Ok(aggregate(&envelope.data))
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use similar_asserts::assert_eq;
    use test_log::test;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    /// Runs the blocking fetch off the async runtime; the blocking client
    /// must not be created or dropped on it.
    async fn fetch(url: String) -> Result<MetricSet, FetchError> {
        tokio::task::spawn_blocking(move || {
            let fetcher = SessionFetcher::new(FetcherConfig { url, timeout: None })?;
            fetcher.fetch_metrics()
        })
        .await
        .expect("fetch task panicked")
    }

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[test(tokio::test)]
    async fn aggregates_sessions() {
        let server = serve(
            200,
            r#"{"status_code":200,"message":null,"data":[{"total":10,"total_active":4},{"total":5,"total_active":5}]}"#,
        )
        .await;

        let metrics = fetch(format!("{}/sessions", server.uri())).await.unwrap();
        assert_eq!(
            metrics,
            MetricSet {
                total: 15.0,
                total_active: 9.0,
                total_meeting: 2.0,
            }
        );
    }

    #[test(tokio::test)]
    async fn null_counts_are_summed_as_zero() {
        let server = serve(
            200,
            r#"{"data":[{"total":null,"total_active":3},{"total":5,"total_active":null}]}"#,
        )
        .await;

        let metrics = fetch(format!("{}/sessions", server.uri())).await.unwrap();
        assert_eq!(
            metrics,
            MetricSet {
                total: 5.0,
                total_active: 3.0,
                total_meeting: 2.0,
            }
        );
    }

    #[test(tokio::test)]
    async fn empty_data_is_all_zero() {
        let server = serve(200, r#"{"data":[]}"#).await;
        let metrics = fetch(format!("{}/sessions", server.uri())).await.unwrap();
        assert_eq!(metrics, MetricSet::default());
    }

    #[test(tokio::test)]
    async fn malformed_body_is_decode_error() {
        let server = serve(200, "<html>gateway</html>").await;
        let err = fetch(format!("{}/sessions", server.uri())).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
    }

    #[test(tokio::test)]
    async fn non_success_status_is_reported() {
        let server = serve(503, r#"{"data":[{"total":1,"total_active":1}]}"#).await;
        let err = fetch(format!("{}/sessions", server.uri())).await.unwrap_err();
        match err {
            FetchError::Status(status) => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test(tokio::test)]
    async fn unreachable_upstream_is_request_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = fetch(format!("http://127.0.0.1:{port}/sessions")).await.unwrap_err();
        match err {
            FetchError::Request { url, .. } => {
                assert_eq!(url, format!("http://127.0.0.1:{port}/sessions"))
            }
            other => panic!("expected request error, got {other:?}"),
        }
    }

    #[test]
    fn timeout_is_applied() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/sessions", listener.local_addr().unwrap());

        // The listener accepts into its backlog but never answers.
        let fetcher = SessionFetcher::new(FetcherConfig {
            url,
            timeout: Some(Duration::from_millis(200)),
        })
        .unwrap();
        let err = fetcher.fetch_metrics().unwrap_err();
        match err {
            FetchError::Request { source, .. } => assert!(source.is_timeout(), "{source:?}"),
            other => panic!("expected timeout, got {other:?}"),
        }
        drop(listener);
    }
}
