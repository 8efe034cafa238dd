//! File Search client: store listing and grounded queries.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::auth::{CredentialResolver, GOOGLE_PROVIDER_ID};
use crate::config::{self, HostConfig, PluginConfig};
use crate::error::FileSearchError;
use crate::execution::{execute_get_request, execute_json_request};
use crate::types::{
    Content, FileSearch, GeminiTool, GenerateContentRequest, GenerateContentResponse,
    GroundingChunk, ListFileSearchStoresResponse, Part, QueryResult, Source, Store,
};

/// Canonical resource-name prefix for store identifiers.
pub const STORE_NAME_PREFIX: &str = "fileSearchStores/";

/// Client for the Gemini File Search API.
///
/// Holds no per-call state: the credential and the effective configuration
/// are resolved fresh on every call, so concurrent calls need no
/// coordination.
#[derive(Clone)]
pub struct FileSearchClient {
    credential_resolver: Arc<dyn CredentialResolver>,
    http_client: reqwest::Client,
    host_config: Option<HostConfig>,
    plugin_config: Option<PluginConfig>,
    agent_dir: Option<PathBuf>,
}

impl std::fmt::Debug for FileSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSearchClient")
            .field("host_config", &self.host_config)
            .field("plugin_config", &self.plugin_config)
            .field("agent_dir", &self.agent_dir)
            .finish()
    }
}

impl FileSearchClient {
    /// Create a client with an injected credential resolver.
    pub fn new(credential_resolver: Arc<dyn CredentialResolver>) -> Self {
        Self {
            credential_resolver,
            http_client: reqwest::Client::new(),
            host_config: None,
            plugin_config: None,
            agent_dir: None,
        }
    }

    /// Set the host-wide configuration.
    pub fn with_host_config(mut self, host_config: HostConfig) -> Self {
        self.host_config = Some(host_config);
        self
    }

    /// Set the plugin-level configuration.
    pub fn with_plugin_config(mut self, plugin_config: PluginConfig) -> Self {
        self.plugin_config = Some(plugin_config);
        self
    }

    /// Set the working-directory hint passed to the credential resolver.
    pub fn with_agent_dir(mut self, agent_dir: impl Into<PathBuf>) -> Self {
        self.agent_dir = Some(agent_dir.into());
        self
    }

    /// Use a custom reqwest client (connection pool reuse, proxies).
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// List the File Search stores available to the resolved credential.
    ///
    /// Provider order is preserved; no client-side sorting or filtering. An
    /// account with zero stores returns an empty list, not an error.
    pub async fn list_stores(&self) -> Result<Vec<Store>, FileSearchError> {
        let api_key = self
            .credential_resolver
            .resolve(
                GOOGLE_PROVIDER_ID,
                self.host_config.as_ref(),
                self.agent_dir.as_deref(),
            )
            .await?;
        let config = config::resolve(
            self.host_config.as_ref(),
            self.plugin_config.as_ref(),
            None,
            &api_key,
        );

        tracing::debug!(base_url = %config.base_url, "listing file search stores");

        let url = format!(
            "{}/fileSearchStores?key={}",
            config.base_url,
            api_key.expose_secret()
        );
        let json =
            execute_get_request(&self.http_client, &url, &config.headers, config.timeout).await?;
        let list: ListFileSearchStoresResponse = serde_json::from_value(json).map_err(|e| {
            FileSearchError::ParseError(format!("failed to parse fileSearchStores response: {e}"))
        })?;
        Ok(list.file_search_stores)
    }

    /// Run a grounded query against one or more stores.
    ///
    /// Store names are trimmed and given the canonical prefix; the list is
    /// silently truncated to the effective per-query cap. Fails with
    /// [`FileSearchError::InvalidParameter`] before any network I/O when the
    /// list is empty after normalization. Blank query text is the tool
    /// layer's concern and is not re-validated here.
    pub async fn query(
        &self,
        query: &str,
        store_names: &[String],
        model: Option<&str>,
    ) -> Result<QueryResult, FileSearchError> {
        let mut stores = normalize_store_names(store_names);
        if stores.is_empty() {
            return Err(FileSearchError::InvalidParameter(
                "at least one store name is required".to_string(),
            ));
        }

        let api_key = self
            .credential_resolver
            .resolve(
                GOOGLE_PROVIDER_ID,
                self.host_config.as_ref(),
                self.agent_dir.as_deref(),
            )
            .await?;
        let config = config::resolve(
            self.host_config.as_ref(),
            self.plugin_config.as_ref(),
            model,
            &api_key,
        );

        if stores.len() > config.max_stores {
            // Silent clamp: first max_stores entries, original order.
            stores.truncate(config.max_stores);
        }

        tracing::debug!(
            model = %config.model,
            store_count = stores.len(),
            "running file search query"
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(query.to_string()),
                }],
                role: Some("user".to_string()),
            }],
            tools: Some(vec![GeminiTool {
                file_search: FileSearch {
                    file_search_store_names: stores,
                },
            }]),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            config.base_url,
            urlencoding::encode(&config.model),
            api_key.expose_secret()
        );
        let body = serde_json::to_value(&request)
            .map_err(|e| FileSearchError::ParseError(format!("failed to encode request: {e}")))?;
        let json = execute_json_request(
            &self.http_client,
            &url,
            &config.headers,
            &body,
            config.timeout,
        )
        .await?;
        let response: GenerateContentResponse = serde_json::from_value(json).map_err(|e| {
            FileSearchError::ParseError(format!("failed to parse generateContent response: {e}"))
        })?;
        Ok(extract_result(response))
    }
}

/// Trim each identifier and apply the canonical prefix; blank entries are
/// dropped. Idempotent: already-prefixed names pass through unchanged.
fn normalize_store_names(store_names: &[String]) -> Vec<String> {
    store_names
        .iter()
        .filter_map(|name| normalize_store_name(name))
        .collect()
}

fn normalize_store_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with(STORE_NAME_PREFIX) {
        Some(trimmed.to_string())
    } else {
        Some(format!("{STORE_NAME_PREFIX}{trimmed}"))
    }
}

/// Map the provider response into the stable result shape: all text parts of
/// the first candidate concatenated and trimmed, plus its grounding sources.
fn extract_result(response: GenerateContentResponse) -> QueryResult {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return QueryResult {
            answer: String::new(),
            sources: Vec::new(),
        };
    };

    let answer = candidate
        .content
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string();

    let sources = candidate
        .grounding_metadata
        .and_then(|metadata| metadata.grounding_chunks)
        .map(|chunks| chunks.iter().filter_map(source_from_chunk).collect())
        .unwrap_or_default();

    QueryResult { answer, sources }
}

/// Build a [`Source`] from a grounding chunk. Title falls back to the URI;
/// a missing URI becomes the empty string; chunks carrying neither are
/// dropped entirely rather than emitted as empty placeholders.
fn source_from_chunk(chunk: &GroundingChunk) -> Option<Source> {
    let (uri, title) = match chunk {
        GroundingChunk::RetrievedContext { retrieved_context } => (
            retrieved_context.uri.as_deref(),
            retrieved_context.title.as_deref(),
        ),
        GroundingChunk::Web { web } => (web.uri.as_deref(), web.title.as_deref()),
        GroundingChunk::Other(_) => return None,
    };

    let uri = uri.unwrap_or("");
    let title = title.unwrap_or("");
    if uri.is_empty() && title.is_empty() {
        return None;
    }

    Some(Source {
        title: if title.is_empty() {
            uri.to_string()
        } else {
            title.to_string()
        },
        uri: uri.to_string(),
    })
}
