//! Search stage: full-text match query against the tag index.

pub(crate) mod elasticsearch;

pub use elasticsearch::ElasticsearchClient;

use crate::error::SearchError;
use crate::types::SearchHit;
use async_trait::async_trait;
use serde_json::json;

/// Field holding image tags in indexed documents.
pub const TAGS_FIELD: &str = "tags";

/// Index holding tagged image documents.
pub const IMAGES_INDEX: &str = "images";

/// A search index that accepts query DSL bodies.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Run `body` against `index` and return the hits as given.
    async fn search(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<SearchHit>, SearchError>;
}

/// Build a single-clause match query: `{"query": {"match": {field: query}}}`.
pub fn match_query(field: &str, query: &str) -> serde_json::Value {
    let mut clause = serde_json::Map::new();
    clause.insert(field.to_string(), serde_json::Value::from(query));
    json!({ "query": { "match": clause } })
}

/// Search `index` for documents whose tags match `query`.
pub async fn search_images(
    backend: &dyn SearchBackend,
    index: &str,
    query: &str,
) -> Result<Vec<SearchHit>, SearchError> {
    search_field(backend, index, TAGS_FIELD, query).await
}

/// Search `index` with a match query on an arbitrary field.
pub async fn search_field(
    backend: &dyn SearchBackend,
    index: &str,
    field: &str,
    query: &str,
) -> Result<Vec<SearchHit>, SearchError> {
    let body = match_query(field, query);
    tracing::debug!("Searching {} via {}: {}", index, backend.name(), body);

    let hits = backend.search(index, &body).await?;
    tracing::info!("{} hits for '{}' in {}", hits.len(), query, index);
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process index: a match query hits a document when any
    /// whitespace-separated query term equals (case-insensitively) a term of
    /// the field's value(s).
    struct InMemoryIndex {
        index: String,
        documents: Vec<(String, serde_json::Value)>,
    }

    impl InMemoryIndex {
        fn terms(value: &serde_json::Value) -> Vec<String> {
            match value {
                serde_json::Value::String(s) => {
                    s.split_whitespace().map(|t| t.to_lowercase()).collect()
                }
                serde_json::Value::Array(items) => items.iter().flat_map(Self::terms).collect(),
                _ => Vec::new(),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for InMemoryIndex {
        fn name(&self) -> &str {
            "in-memory"
        }

        async fn search(
            &self,
            index: &str,
            body: &serde_json::Value,
        ) -> Result<Vec<SearchHit>, SearchError> {
            if index != self.index {
                return Err(SearchError::IndexNotFound {
                    index: index.to_string(),
                });
            }
            let clause = body["query"]["match"]
                .as_object()
                .and_then(|m| m.iter().next())
                .ok_or_else(|| SearchError::Http {
                    status_code: 400,
                    message: "expected a match query".to_string(),
                })?;
            let (field, query) = clause;
            let wanted = Self::terms(query);

            Ok(self
                .documents
                .iter()
                .filter(|(_, doc)| {
                    let have = Self::terms(&doc[field.as_str()]);
                    wanted.iter().any(|t| have.contains(t))
                })
                .map(|(id, doc)| SearchHit {
                    index: self.index.clone(),
                    id: id.clone(),
                    score: Some(1.0),
                    source: doc.clone(),
                })
                .collect())
        }
    }

    fn sample_index() -> InMemoryIndex {
        InMemoryIndex {
            index: IMAGES_INDEX.to_string(),
            documents: vec![
                (
                    "1".to_string(),
                    json!({ "file": "forest.jpg", "tags": ["nature", "forest"] }),
                ),
                (
                    "2".to_string(),
                    json!({ "file": "skyline.jpg", "tags": ["city"] }),
                ),
            ],
        }
    }

    #[test]
    fn test_match_query_shape() {
        assert_eq!(
            match_query(TAGS_FIELD, "nature"),
            json!({ "query": { "match": { "tags": "nature" } } })
        );
    }

    #[test]
    fn test_match_query_is_deterministic() {
        let a = match_query(TAGS_FIELD, "sunset beach");
        let b = match_query(TAGS_FIELD, "sunset beach");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_match_query_passes_query_verbatim() {
        let body = match_query(TAGS_FIELD, "\"quoted\" AND weird:chars");
        assert_eq!(body["query"]["match"]["tags"], "\"quoted\" AND weird:chars");
    }

    #[tokio::test]
    async fn test_search_returns_only_matching_documents() {
        let index = sample_index();
        let hits = search_images(&index, IMAGES_INDEX, "nature").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
        assert_eq!(hits[0].source["file"], "forest.jpg");
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let index = sample_index();
        let hits = search_images(&index, IMAGES_INDEX, "ocean").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_missing_index_propagates() {
        let index = sample_index();
        let err = search_images(&index, "photos", "nature").await.unwrap_err();
        assert!(matches!(err, SearchError::IndexNotFound { .. }));
    }
}
