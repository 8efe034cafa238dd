//! gemini-file-search
//!
//! Client/adapter for Google's Gemini File Search API: grounded queries
//! against provider-hosted document stores, plus store listing, exposed both
//! as a typed client and as agent-framework tool definitions.
//!
//! This crate owns:
//! - the core client (credential + configuration resolution, HTTP execution
//!   with per-call deadlines, response mapping)
//! - the thin tool-call presentation layer (schemas, validation, rendering)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gemini_file_search::{EnvCredentialResolver, FileSearchClient};
//!
//! let client = FileSearchClient::new(Arc::new(EnvCredentialResolver::new()));
//! let stores = client.list_stores().await?;
//! let result = client.query("what changed in v2?", &[stores[0].name.clone()], None).await?;
//! ```
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod execution;
pub mod tools;
pub mod types;

pub use auth::{CredentialResolver, EnvCredentialResolver, GOOGLE_PROVIDER_ID};
pub use client::{FileSearchClient, STORE_NAME_PREFIX};
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS, EffectiveConfig, HostConfig,
    MAX_STORES_HARD_LIMIT, PluginConfig,
};
pub use error::FileSearchError;
pub use types::{QueryResult, Source, Store};
