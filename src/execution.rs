//! HTTP request execution.
//!
//! One GET and one POST entry point, both with a hard per-call deadline.
//! A non-success status becomes an [`FileSearchError::ApiError`] carrying the
//! status code and the raw body text; an elapsed deadline becomes a
//! [`FileSearchError::TimeoutError`], distinct from other network failures.
//! Successful bodies are returned as raw [`serde_json::Value`] — type safety
//! is applied by the callers.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;

use crate::error::FileSearchError;

/// Execute a GET request with a deadline and return the parsed JSON body.
pub async fn execute_get_request(
    http_client: &reqwest::Client,
    url: &str,
    headers: &HashMap<String, String>,
    timeout: Duration,
) -> Result<serde_json::Value, FileSearchError> {
    execute(http_client, Method::GET, url, headers, None, timeout).await
}

/// Execute a POST request with a JSON body and a deadline, returning the
/// parsed JSON response body.
pub async fn execute_json_request(
    http_client: &reqwest::Client,
    url: &str,
    headers: &HashMap<String, String>,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<serde_json::Value, FileSearchError> {
    execute(http_client, Method::POST, url, headers, Some(body), timeout).await
}

async fn execute(
    http_client: &reqwest::Client,
    method: Method,
    url: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    timeout: Duration,
) -> Result<serde_json::Value, FileSearchError> {
    let mut rb = http_client.request(method.clone(), url);
    for (name, value) in headers {
        rb = rb.header(name, value);
    }
    if let Some(body) = body {
        rb = rb.json(body);
    }

    // The deadline covers both the send and the body read. Dropping the timed
    // future aborts the in-flight request, so the timer is released on every
    // exit path.
    let send_and_read = async {
        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(map_reqwest_error)?;
        Ok::<_, FileSearchError>((status, text))
    };

    let (status, text) = match tokio::time::timeout(timeout, send_and_read).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::debug!(method = %method, timeout_ms = timeout.as_millis() as u64, "request deadline elapsed");
            return Err(FileSearchError::TimeoutError(format!(
                "request timed out after {}ms",
                timeout.as_millis()
            )));
        }
    };

    tracing::trace!(method = %method, status = status.as_u16(), "file search request completed");

    if !status.is_success() {
        return Err(FileSearchError::api_error(status.as_u16(), text));
    }

    serde_json::from_str(&text)
        .map_err(|e| FileSearchError::ParseError(format!("invalid JSON response body: {e}")))
}

fn map_reqwest_error(e: reqwest::Error) -> FileSearchError {
    if e.is_timeout() {
        return FileSearchError::TimeoutError(format!("request timed out: {e}"));
    }
    FileSearchError::HttpError(e.to_string())
}
