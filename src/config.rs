//! Configuration resolution.
//!
//! Three layers feed one [`EffectiveConfig`] per call: fixed defaults, an
//! optional host-wide configuration, and an optional plugin configuration.
//! Resolution never fails — absent or malformed inputs fall back to the
//! defaults.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for grounded generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Hard cap on the number of stores named in a single query. Configuration
/// may lower this, never raise it.
pub const MAX_STORES_HARD_LIMIT: usize = 10;

/// Header carrying the API key. Always computed fresh from the resolved
/// credential; host-supplied headers cannot override it.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// The File Search API is never served through the OpenAI-compatibility
/// surface; base URLs pointing at it are truncated to the native API root.
const OPENAI_COMPAT_SEGMENT: &str = "/openai";

/// Host-wide configuration supplied by the embedding agent framework.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    /// Provider base URL override.
    pub base_url: Option<String>,
    /// Provider-specific headers merged into every request.
    pub headers: HashMap<String, String>,
    /// Explicit API key, consulted first by [`crate::auth::EnvCredentialResolver`].
    pub api_key: Option<String>,
}

impl std::fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostConfig")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("api_key_present", &self.api_key.is_some())
            .finish()
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Plugin-level configuration with named optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Default model when no per-call override is given.
    pub default_model: Option<String>,
    /// Cap on stores per query; clamped to [`MAX_STORES_HARD_LIMIT`].
    pub max_stores_per_query: Option<usize>,
    /// Per-request deadline in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_max_stores_per_query(mut self, max: usize) -> Self {
        self.max_stores_per_query = Some(max);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Fully-resolved operational parameters for one call. Derived, never
/// persisted; computed fresh each time.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub base_url: String,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
    pub model: String,
    /// Invariant: `1 <= max_stores <= MAX_STORES_HARD_LIMIT`.
    pub max_stores: usize,
}

/// Resolve the effective configuration for one call.
///
/// `model_override` is the per-call model request; it outranks the plugin's
/// `default_model`, which outranks [`DEFAULT_MODEL`]. Blank values at any
/// level are treated as absent.
pub fn resolve(
    host: Option<&HostConfig>,
    plugin: Option<&PluginConfig>,
    model_override: Option<&str>,
    api_key: &SecretString,
) -> EffectiveConfig {
    let base_url = host
        .and_then(|h| h.base_url.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    if let Some(host) = host {
        for (name, value) in &host.headers {
            // Host headers win on collision, except for the key header: the
            // freshly resolved credential is not overridable.
            if name.eq_ignore_ascii_case(API_KEY_HEADER) {
                continue;
            }
            headers.insert(name.clone(), value.clone());
        }
    }
    headers.insert(
        API_KEY_HEADER.to_string(),
        api_key.expose_secret().to_string(),
    );

    let timeout = Duration::from_millis(
        plugin
            .and_then(|p| p.timeout_ms)
            .filter(|&ms| ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS),
    );

    let model = model_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            plugin
                .and_then(|p| p.default_model.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let max_stores = plugin
        .and_then(|p| p.max_stores_per_query)
        .filter(|&n| n >= 1)
        .unwrap_or(MAX_STORES_HARD_LIMIT)
        .min(MAX_STORES_HARD_LIMIT);

    EffectiveConfig {
        base_url,
        headers,
        timeout,
        model,
        max_stores,
    }
}

/// Strip trailing slashes and truncate at the OpenAI-compatibility segment.
fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim().trim_end_matches('/');
    if let Some(idx) = url.find(OPENAI_COMPAT_SEGMENT) {
        let rest = &url[idx + OPENAI_COMPAT_SEGMENT.len()..];
        if rest.is_empty() || rest.starts_with('/') {
            url = &url[..idx];
        }
    }
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("test-key".to_string())
    }

    #[test]
    fn defaults_apply_with_no_configuration() {
        let cfg = resolve(None, None, None, &key());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(cfg.max_stores, MAX_STORES_HARD_LIMIT);
        assert_eq!(cfg.headers.get(API_KEY_HEADER).unwrap(), "test-key");
        assert_eq!(cfg.headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn base_url_trailing_slashes_are_stripped() {
        let host = HostConfig::new().with_base_url("https://example.com/v1beta///");
        let cfg = resolve(Some(&host), None, None, &key());
        assert_eq!(cfg.base_url, "https://example.com/v1beta");
    }

    #[test]
    fn base_url_openai_compat_segment_is_truncated() {
        let host = HostConfig::new()
            .with_base_url("https://generativelanguage.googleapis.com/v1beta/openai/");
        let cfg = resolve(Some(&host), None, None, &key());
        assert_eq!(
            cfg.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn base_url_with_openai_substring_in_host_is_untouched() {
        let host = HostConfig::new().with_base_url("https://openai-proxy.example.com/v1beta");
        let cfg = resolve(Some(&host), None, None, &key());
        assert_eq!(cfg.base_url, "https://openai-proxy.example.com/v1beta");
    }

    #[test]
    fn blank_base_url_falls_back_to_default() {
        let host = HostConfig::new().with_base_url("   ");
        let cfg = resolve(Some(&host), None, None, &key());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn host_headers_win_except_for_the_key_header() {
        let host = HostConfig::new()
            .with_header("content-type", "application/json; charset=utf-8")
            .with_header("x-custom", "yes")
            .with_header("X-Goog-Api-Key", "stale-key");
        let cfg = resolve(Some(&host), None, None, &key());
        assert_eq!(
            cfg.headers.get("content-type").unwrap(),
            "application/json; charset=utf-8"
        );
        assert_eq!(cfg.headers.get("x-custom").unwrap(), "yes");
        // The freshly resolved key is never overridden.
        assert_eq!(cfg.headers.get(API_KEY_HEADER).unwrap(), "test-key");
        assert!(!cfg.headers.contains_key("X-Goog-Api-Key"));
    }

    #[test]
    fn model_precedence_override_then_plugin_then_default() {
        let plugin = PluginConfig::new().with_default_model("gemini-2.0-flash");

        let cfg = resolve(None, Some(&plugin), Some("gemini-2.5-pro"), &key());
        assert_eq!(cfg.model, "gemini-2.5-pro");

        let cfg = resolve(None, Some(&plugin), None, &key());
        assert_eq!(cfg.model, "gemini-2.0-flash");

        let cfg = resolve(None, None, None, &key());
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }

    #[test]
    fn blank_model_override_is_treated_as_absent() {
        let plugin = PluginConfig::new().with_default_model("gemini-2.0-flash");
        let cfg = resolve(None, Some(&plugin), Some("   "), &key());
        assert_eq!(cfg.model, "gemini-2.0-flash");
    }

    #[test]
    fn max_stores_cannot_exceed_the_hard_limit() {
        let plugin = PluginConfig::new().with_max_stores_per_query(99);
        let cfg = resolve(None, Some(&plugin), None, &key());
        assert_eq!(cfg.max_stores, MAX_STORES_HARD_LIMIT);
    }

    #[test]
    fn max_stores_can_be_lowered() {
        let plugin = PluginConfig::new().with_max_stores_per_query(2);
        let cfg = resolve(None, Some(&plugin), None, &key());
        assert_eq!(cfg.max_stores, 2);
    }

    #[test]
    fn zero_max_stores_falls_back_to_the_hard_limit() {
        let plugin = PluginConfig::new().with_max_stores_per_query(0);
        let cfg = resolve(None, Some(&plugin), None, &key());
        assert_eq!(cfg.max_stores, MAX_STORES_HARD_LIMIT);
    }

    #[test]
    fn plugin_timeout_overrides_the_default() {
        let plugin = PluginConfig::new().with_timeout_ms(5_000);
        let cfg = resolve(None, Some(&plugin), None, &key());
        assert_eq!(cfg.timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn plugin_config_deserializes_from_camel_case_json() {
        let plugin: PluginConfig = serde_json::from_str(
            r#"{"defaultModel":"gemini-2.0-flash","maxStoresPerQuery":3,"timeoutMs":1000}"#,
        )
        .unwrap();
        assert_eq!(plugin.default_model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(plugin.max_stores_per_query, Some(3));
        assert_eq!(plugin.timeout_ms, Some(1000));
    }

    #[test]
    fn host_config_debug_hides_the_api_key() {
        let host = HostConfig::new().with_api_key("super-secret");
        let rendered = format!("{host:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("api_key_present"));
    }
}
