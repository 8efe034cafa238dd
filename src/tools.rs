//! Tool-call surface for host agent frameworks.
//!
//! Thin presentation layer over [`FileSearchClient`]: tool definitions with
//! JSON Schema parameters, raw-argument validation, and plain-text rendering
//! of results. Everything here consumes the two core operations; it adds no
//! semantics of its own beyond input validation and formatting.

use serde_json::{Value, json};

use crate::client::FileSearchClient;
use crate::error::FileSearchError;
use crate::types::{QueryResult, Store};

/// Tool name for grounded queries.
pub const FILE_SEARCH_TOOL: &str = "file_search";

/// Tool name for store listing.
pub const LIST_STORES_TOOL: &str = "file_search_list_stores";

/// A tool definition as registered with the host framework.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema for the tool's arguments.
    pub parameters: Value,
}

/// Definition of the grounded-query tool.
pub fn file_search_tool() -> ToolSpec {
    ToolSpec {
        name: FILE_SEARCH_TOOL,
        description: "Search the documents in one or more File Search stores and \
                      answer the query with citations.",
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question to answer from the stored documents."
                },
                "store_names": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Store names to search, e.g. \"fileSearchStores/my-store\" or the bare id."
                },
                "model": {
                    "type": "string",
                    "description": "Optional model override."
                }
            },
            "required": ["query", "store_names"]
        }),
    }
}

/// Definition of the store-listing tool.
pub fn list_stores_tool() -> ToolSpec {
    ToolSpec {
        name: LIST_STORES_TOOL,
        description: "List the File Search stores available to this account.",
        parameters: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Validate raw tool arguments and run a grounded query, returning display
/// text. A blank query is rejected here, before any network call.
pub async fn run_file_search(
    client: &FileSearchClient,
    args: &Value,
) -> Result<String, FileSearchError> {
    let query = args.get("query").and_then(Value::as_str).unwrap_or("");
    if query.trim().is_empty() {
        return Err(FileSearchError::InvalidParameter(
            "query must not be blank".to_string(),
        ));
    }

    let store_names: Vec<String> = args
        .get("store_names")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let model = args.get("model").and_then(Value::as_str);

    let result = client.query(query, &store_names, model).await?;
    Ok(render_query_result(&result))
}

/// List stores and return display text.
pub async fn run_list_stores(client: &FileSearchClient) -> Result<String, FileSearchError> {
    let stores = client.list_stores().await?;
    Ok(render_store_list(&stores))
}

/// Render a query result: answer first, then a `Sources:` block.
pub fn render_query_result(result: &QueryResult) -> String {
    let mut out = if result.answer.is_empty() {
        "No answer returned.".to_string()
    } else {
        result.answer.clone()
    };

    if !result.sources.is_empty() {
        out.push_str("\n\nSources:\n");
        for (i, source) in result.sources.iter().enumerate() {
            if source.uri.is_empty() || source.title == source.uri {
                out.push_str(&format!("{}. {}\n", i + 1, source.title));
            } else {
                out.push_str(&format!("{}. {} ({})\n", i + 1, source.title, source.uri));
            }
        }
    }
    out
}

/// Render the store listing as numbered lines.
pub fn render_store_list(stores: &[Store]) -> String {
    if stores.is_empty() {
        return "No file search stores available.".to_string();
    }
    let mut out = String::new();
    for (i, store) in stores.iter().enumerate() {
        match store.display_name.as_deref() {
            Some(display_name) if !display_name.is_empty() => {
                out.push_str(&format!("{}. {} — {}\n", i + 1, store.name, display_name));
            }
            _ => out.push_str(&format!("{}. {}\n", i + 1, store.name)),
        }
    }
    out
}
