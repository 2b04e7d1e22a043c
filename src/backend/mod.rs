//! Search backend seam.
//!
//! The paginator only talks to a [`SearchBackend`]; the HTTP client in
//! [`zoekt`] and the in-memory [`mock::StaticBackend`] both implement it.
pub mod mock;
pub mod models;
pub mod zoekt;

use async_trait::async_trait;

use crate::error::SearchError;
pub use models::FileMatch;

/// One backend search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Maximum number of file-level matches to return.
    pub limit: usize,
    pub context_lines: usize,
}

impl SearchRequest {
    /// Request sized to cover `offset + limit` items plus one sentinel file,
    /// assuming roughly one item per file.
    #[must_use]
    pub fn inflated(query: impl Into<String>, limit: usize, offset: usize, context_lines: usize) -> Self {
        Self {
            query: query.into(),
            limit: limit.saturating_add(offset).saturating_add(1),
            context_lines,
        }
    }
}

/// A remote code-search service.
///
/// Implementations must be `Send + Sync`; concurrent calls never share
/// mutable state.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one query and return normalized file matches in backend order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<FileMatch>, SearchError>;
}
