//! Public data contracts and Gemini wire types.
//!
//! The public surface is deliberately small: [`Store`], [`QueryResult`] and
//! [`Source`]. The remaining types mirror the generateContent and
//! fileSearchStores JSON shapes (v1beta) and stay crate-private.

use serde::{Deserialize, Serialize};

/// A provider-hosted document collection usable as a grounding corpus.
///
/// Read-only on this side: stores are created and destroyed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Resource name, e.g. "fileSearchStores/abc123"
    pub name: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none", rename = "displayName")]
    pub display_name: Option<String>,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Result of one grounded query. Constructed fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Concatenated answer text; empty when the provider returned no
    /// candidates.
    pub answer: String,
    /// Citation sources, in provider order.
    pub sources: Vec<Source>,
}

/// A citation source backing part of an answer. At least one of `title` and
/// `uri` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

// ---------------------------------------------------------------------------
// Wire types (Gemini v1beta)
// ---------------------------------------------------------------------------

/// `GET /fileSearchStores` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListFileSearchStoresResponse {
    /// Absent field deserializes to an empty list: an account with zero
    /// stores is a valid, non-exceptional state.
    #[serde(default, rename = "fileSearchStores")]
    pub file_search_stores: Vec<Store>,
}

/// `POST /models/{model}:generateContent` request body (single-turn subset).
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiTool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Tool declaration naming the grounding stores for this request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeminiTool {
    #[serde(rename = "fileSearch")]
    pub file_search: FileSearch,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileSearch {
    #[serde(rename = "fileSearchStoreNames")]
    pub file_search_store_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(rename = "groundingMetadata")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GroundingMetadata {
    #[serde(rename = "groundingChunks")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

/// One grounding chunk. File Search grounding arrives as `retrievedContext`;
/// `web` chunks may be interleaved when other grounding tools are active.
/// Unrecognized chunk kinds deserialize into `Other` instead of failing the
/// whole response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum GroundingChunk {
    RetrievedContext {
        #[serde(rename = "retrievedContext")]
        retrieved_context: RetrievedContextChunk,
    },
    Web {
        web: WebGroundingChunk,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RetrievedContextChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WebGroundingChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_list_with_absent_field_is_empty() {
        let list: ListFileSearchStoresResponse = serde_json::from_value(json!({})).unwrap();
        assert!(list.file_search_stores.is_empty());
    }

    #[test]
    fn store_deserializes_camel_case_fields() {
        let store: Store = serde_json::from_value(json!({
            "name": "fileSearchStores/abc123",
            "displayName": "Docs",
            "description": "Internal documentation"
        }))
        .unwrap();
        assert_eq!(store.name, "fileSearchStores/abc123");
        assert_eq!(store.display_name.as_deref(), Some("Docs"));
        assert_eq!(store.description.as_deref(), Some("Internal documentation"));
    }

    #[test]
    fn generate_content_request_serializes_tool_config() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("what is in the docs?".to_string()),
                }],
                role: Some("user".to_string()),
            }],
            tools: Some(vec![GeminiTool {
                file_search: FileSearch {
                    file_search_store_names: vec!["fileSearchStores/s1".to_string()],
                },
            }]),
        };
        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "what is in the docs?");
        assert_eq!(
            v["tools"][0]["fileSearch"]["fileSearchStoreNames"][0],
            "fileSearchStores/s1"
        );
    }

    #[test]
    fn grounding_chunks_distinguish_retrieved_context_and_web() {
        let metadata: GroundingMetadata = serde_json::from_value(json!({
            "groundingChunks": [
                { "retrievedContext": { "uri": "https://example.com/a", "title": "Doc A" } },
                { "web": { "uri": "https://example.com/w", "title": "Web W" } },
                { "maps": { "uri": "https://maps.example.com" } }
            ]
        }))
        .unwrap();
        let chunks = metadata.grounding_chunks.unwrap();
        assert!(matches!(chunks[0], GroundingChunk::RetrievedContext { .. }));
        assert!(matches!(chunks[1], GroundingChunk::Web { .. }));
        assert!(matches!(chunks[2], GroundingChunk::Other(_)));
    }
}
