//! Stateless, cursor-addressed paging over item-level results.
//!
//! Every call re-runs the backend query with an inflated file limit
//! (`limit + offset + 1`), extracts items from the whole response and slices
//! `items[offset..offset + limit]`. Deep pages therefore cost more than
//! shallow ones; no paging state is held between calls.
//!
//! The inflated limit counts files, not items, so a response dominated by a
//! few very dense files can produce a short page even though later files hold
//! more items.
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::backend::{SearchBackend, SearchRequest};
use crate::cursor::{generate_next_cursor, validate_cursor};
use crate::error::SearchError;
use crate::extract::{
    ContentExtractor, ContentMatch, DefinitionExtractor, FileExtractor, FileResult,
    ItemExtractor, ReferenceResult, Symbol, SymbolExtractor, UsageExtractor, deduplicate,
};
use crate::query::{content_query, wrap_filename_query, wrap_symbol_query};

/// One page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Paging parameters for the single-query tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub limit: usize,
    pub context_lines: usize,
    pub cursor: Option<String>,
}

/// Paging parameters for reference finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRequest {
    pub symbol: String,
    pub filters: Option<String>,
    pub limit: usize,
    pub context_lines: usize,
    pub cursor: Option<String>,
}

/// Resolve the starting offset. No cursor means offset 0; a bad cursor fails
/// before any backend call.
pub fn resolve_offset(cursor: Option<&str>, query: &str) -> Result<usize, SearchError> {
    let Some(token) = cursor.filter(|c| !c.trim().is_empty()) else {
        return Ok(0);
    };
    let cursor = validate_cursor(token, query)?;
    usize::try_from(cursor.offset).map_err(|_| SearchError::InvalidOffset(cursor.offset))
}

/// Slice `items` into the page at `offset` and compute its continuation.
#[must_use]
pub fn paginate<T>(items: Vec<T>, query: &str, offset: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let next_cursor = generate_next_cursor(query, offset, limit, total);
    let has_more = total > offset.saturating_add(limit);
    let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
    debug!(
        total,
        offset,
        returned = items.len(),
        has_more,
        "sliced page"
    );

    Page {
        items,
        offset,
        limit,
        has_more,
        next_cursor,
    }
}

/// Drives query rewriting, backend calls, extraction and slicing.
#[derive(Clone)]
pub struct Paginator {
    backend: Arc<dyn SearchBackend>,
}

impl Paginator {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Symbol definitions matching the query.
    pub async fn search_symbols(&self, req: &PageRequest) -> Result<Page<Symbol>, SearchError> {
        let query = wrap_symbol_query(non_empty(&req.query, "query")?);
        self.run(&SymbolExtractor, &query, req).await
    }

    /// Files whose path matches the query. Never returns content.
    pub async fn search_files(&self, req: &PageRequest) -> Result<Page<FileResult>, SearchError> {
        let query = wrap_filename_query(non_empty(&req.query, "query")?);
        self.run(&FileExtractor, &query, req).await
    }

    /// Content matches for the query as given.
    pub async fn search_code(&self, req: &PageRequest) -> Result<Page<ContentMatch>, SearchError> {
        let query = non_empty(&req.query, "query")?.trim().to_string();
        self.run(&ContentExtractor, &query, req).await
    }

    /// Definitions followed by usages of a symbol.
    ///
    /// Both backend calls run concurrently; if either fails the whole call
    /// fails. The cursor is bound to the symbol-mode definitions query.
    pub async fn find_references(
        &self,
        req: &ReferenceRequest,
    ) -> Result<Page<ReferenceResult>, SearchError> {
        check_limit(req.limit)?;
        let usage_query = content_query(non_empty(&req.symbol, "symbol")?, req.filters.as_deref());
        let definition_query = wrap_symbol_query(&usage_query);
        let offset = resolve_offset(req.cursor.as_deref(), &definition_query)?;

        let definition_req =
            SearchRequest::inflated(definition_query.clone(), req.limit, offset, req.context_lines);
        let usage_req = SearchRequest::inflated(usage_query, req.limit, offset, req.context_lines);

        let (definition_files, usage_files) = tokio::try_join!(
            self.backend.search(&definition_req),
            self.backend.search(&usage_req)
        )?;

        let definitions = DefinitionExtractor.extract(&definition_files);
        let usages = deduplicate(&definitions, UsageExtractor.extract(&usage_files));
        debug!(
            definitions = definitions.len(),
            usages = usages.len(),
            "references extracted"
        );

        let mut items = definitions;
        items.extend(usages);
        Ok(paginate(items, &definition_query, offset, req.limit))
    }

    async fn run<E: ItemExtractor>(
        &self,
        extractor: &E,
        query: &str,
        req: &PageRequest,
    ) -> Result<Page<E::Item>, SearchError> {
        check_limit(req.limit)?;
        let offset = resolve_offset(req.cursor.as_deref(), query)?;
        let request = SearchRequest::inflated(query, req.limit, offset, req.context_lines);
        let files = self.backend.search(&request).await?;
        let items = extractor.extract(&files);
        Ok(paginate(items, query, offset, req.limit))
    }
}

fn non_empty<'a>(value: &'a str, name: &str) -> Result<&'a str, SearchError> {
    if value.trim().is_empty() {
        Err(SearchError::InvalidArgument(format!("{name} is required")))
    } else {
        Ok(value)
    }
}

fn check_limit(limit: usize) -> Result<(), SearchError> {
    if limit == 0 {
        return Err(SearchError::InvalidArgument(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────
