//! reqwest-backed implementation of the `ExecutionsApi` seam.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use runwatch_core::errors::FetchError;
use runwatch_core::lastrun::ExecutionsApi;
use runwatch_core::types::{ExecutionRecord, ExecutionStats, ScriptId, ScriptInfo};

const BODY_SNIPPET_MAX: usize = 120;

pub struct HttpExecutionsApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpExecutionsApi {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        if !self.api_key.is_empty() {
            req = req.header("X-API-Key", &self.api_key);
        }

        let resp = req.send().await.map_err(map_transport)?;
        let status = resp.status();
        tracing::debug!(
            target: "runwatch.http",
            path,
            status = status.as_u16(),
            "backend response"
        );
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => FetchError::Unauthorized,
                404 => FetchError::NotFound {
                    resource: path.to_string(),
                },
                code => {
                    let body = resp.text().await.unwrap_or_default();
                    FetchError::HttpStatus {
                        status: code,
                        body_snippet: snippet(&body),
                    }
                }
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchError::Decode(anyhow::Error::new(e)))
    }
}

#[async_trait]
impl ExecutionsApi for HttpExecutionsApi {
    async fn latest_execution(
        &self,
        script_id: ScriptId,
    ) -> Result<Option<ExecutionRecord>, FetchError> {
        let records: Vec<ExecutionRecord> = self
            .get_json(&format!("/scripts/{script_id}/executions/?limit=1"))
            .await?;
        Ok(records.into_iter().next())
    }

    async fn list_scripts(&self) -> Result<Vec<ScriptInfo>, FetchError> {
        self.get_json("/scripts/db/").await
    }

    async fn execution_stats(&self) -> Result<ExecutionStats, FetchError> {
        self.get_json("/executions/stats/").await
    }
}

fn map_transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Unavailable
    } else {
        FetchError::Transport(anyhow::Error::new(err))
    }
}

fn snippet(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_SNIPPET_MAX).collect();
    if body.chars().count() > BODY_SNIPPET_MAX {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> HttpExecutionsApi {
        HttpExecutionsApi::new(server.url(), String::new(), 5_000).unwrap()
    }

    fn execution_json(id: i64, script_id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "script_id": script_id,
            "schedule_id": null,
            "filename": "backup.py",
            "language": "python",
            "exit_code": 0,
            "execution_time_seconds": 1.5,
            "stdout": "done",
            "stderr": "",
            // FastAPI emits naive UTC timestamps, no offset suffix.
            "executed_at": "2026-08-26T12:00:00.123456",
            "success": true,
            "error_message": null,
            "triggered_by": "schedule"
        })
    }

    #[tokio::test]
    async fn latest_execution_takes_the_first_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/scripts/7/executions/")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body(
                serde_json::json!([execution_json(31, 7), execution_json(30, 7)]).to_string(),
            )
            .create_async()
            .await;

        let api = client(&server);
        let record = api.latest_execution(7).await.unwrap().unwrap();
        assert_eq!(record.id, 31);
        assert_eq!(record.script_id, 7);
        assert_eq!(record.triggered_by, "schedule");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_history_resolves_to_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/scripts/7/executions/")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = client(&server);
        assert!(api.latest_execution(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn api_key_header_is_sent_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/scripts/db/")
            .match_header("X-API-Key", "sekrit")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = HttpExecutionsApi::new(server.url(), "sekrit".into(), 5_000).unwrap();
        api.list_scripts().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_its_own_variant() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/executions/stats/")
            .with_status(401)
            .create_async()
            .await;

        let api = client(&server);
        let err = api.execution_stats().await.unwrap_err();
        assert!(matches!(err, FetchError::Unauthorized));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn missing_script_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/scripts/99/executions/")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(404)
            .with_body(r#"{"detail":"Script not found"}"#)
            .create_async()
            .await;

        let api = client(&server);
        let err = api.latest_execution(99).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn server_error_carries_a_truncated_body_snippet() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/scripts/db/")
            .with_status(500)
            .with_body("x".repeat(500))
            .create_async()
            .await;

        let api = client(&server);
        match api.list_scripts().await.unwrap_err() {
            FetchError::HttpStatus {
                status,
                body_snippet,
            } => {
                assert_eq!(status, 500);
                assert_eq!(body_snippet.chars().count(), BODY_SNIPPET_MAX + 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_maps_to_decode() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/scripts/db/")
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let api = client(&server);
        let err = api.list_scripts().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn stats_payload_round_trips() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/executions/stats/")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "total_executions": 12,
                    "successful_executions": 9,
                    "failed_executions": 3,
                    "success_rate": 75.0,
                    "average_execution_time_seconds": 2.31,
                    "most_executed_scripts": [
                        {"filename": "backup.py", "count": 5}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = client(&server);
        let stats = api.execution_stats().await.unwrap();
        assert_eq!(stats.total_executions, 12);
        assert_eq!(stats.success_rate, 75.0);
        assert_eq!(stats.most_executed_scripts[0].filename, "backup.py");
    }
}
