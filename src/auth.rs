//! Credential resolution.
//!
//! The client never looks up credentials on its own: a [`CredentialResolver`]
//! is injected at construction time and consulted fresh on every call. Keys
//! are held as [`SecretString`] and are never cached or logged.

use std::path::Path;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::config::HostConfig;
use crate::error::FileSearchError;

/// Provider identifier used when resolving Gemini File Search credentials.
pub const GOOGLE_PROVIDER_ID: &str = "google";

/// Produces an API key for a named provider.
///
/// `host_config` and `agent_dir` are resolution hints; implementations may
/// ignore either. A resolver failure propagates unchanged — the client adds
/// no context of its own.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(
        &self,
        provider: &str,
        host_config: Option<&HostConfig>,
        agent_dir: Option<&Path>,
    ) -> Result<SecretString, FileSearchError>;
}

/// Default resolver: an explicit key in the host configuration wins,
/// otherwise the `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment variables
/// are consulted in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialResolver;

impl EnvCredentialResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialResolver for EnvCredentialResolver {
    async fn resolve(
        &self,
        provider: &str,
        host_config: Option<&HostConfig>,
        _agent_dir: Option<&Path>,
    ) -> Result<SecretString, FileSearchError> {
        if let Some(key) = host_config.and_then(|cfg| cfg.api_key.clone())
            && !key.trim().is_empty()
        {
            return Ok(SecretString::from(key));
        }

        for var in ["GEMINI_API_KEY", "GOOGLE_API_KEY"] {
            if let Ok(key) = std::env::var(var)
                && !key.trim().is_empty()
            {
                return Ok(SecretString::from(key));
            }
        }

        Err(FileSearchError::AuthenticationError(format!(
            "no API key found for provider '{provider}' (set GEMINI_API_KEY or GOOGLE_API_KEY)"
        )))
    }
}
