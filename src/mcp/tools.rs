//! MCP Tool handlers for zoekt-mcp.
//!
//! Four item-level, cursor-paginated tools:
//! 1. search_symbols  – symbol definitions (symbol-mode query)
//! 2. search_files    – file paths (filename-mode query), metadata only
//! 3. find_references – definitions + deduplicated usages of a symbol
//! 4. search_code     – plain content matches
//!
//! Every tool returns `{items, offset, limit, hasMore, nextCursor?}`. Pass
//! `nextCursor` back as `cursor` with the same query to get the next page.
use crate::error::SearchError;
use crate::mcp::server::McpContext;
use crate::paginate::{Page, PageRequest, ReferenceRequest};
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{ErrorData as McpError, handler::server::tool::ToolRouter, model::*, tool, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Parameter structs ────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    /// Search query. Filters such as lang:, repo:, file:, branch: are kept as-is
    query: String,
    /// Items per page, 1-100 (default: 30)
    limit: Option<usize>,
    /// Context lines around each match, 0-10 (default: 3)
    context_lines: Option<usize>,
    /// `nextCursor` from the previous page of the same query
    cursor: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
struct FileSearchParams {
    /// Filename or path pattern (e.g. 'handler.go', 'src/.*_test')
    query: String,
    /// Items per page, 1-100 (default: 30)
    limit: Option<usize>,
    /// `nextCursor` from the previous page of the same query
    cursor: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ReferenceParams {
    /// Symbol name to look up
    symbol: String,
    /// Extra filters applied to both definition and usage searches (e.g. 'lang:go repo:api')
    filters: Option<String>,
    /// Items per page, 1-100 (default: 30)
    limit: Option<usize>,
    /// Context lines around each match, 0-10 (default: 3)
    context_lines: Option<usize>,
    /// `nextCursor` from the previous page of the same symbol and filters
    cursor: Option<String>,
}

// ── Response helpers ─────────────────────────────────────────────────

fn json_result(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&value).unwrap_or_default(),
    )]))
}

fn error_result(msg: &str) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.to_string())]))
}

fn page_result<T: Serialize>(page: Result<Page<T>, SearchError>) -> Result<CallToolResult, McpError> {
    match page {
        Ok(page) => {
            let value = serde_json::to_value(&page)
                .map_err(|e| McpError::internal_error(format!("serialize failed: {e}"), None))?;
            json_result(value)
        }
        Err(e) if e.is_cursor_error() => {
            tracing::debug!("rejected cursor: {e}");
            error_result(&e.to_string())
        }
        Err(e) => {
            tracing::warn!("tool call failed: {e}");
            error_result(&e.to_string())
        }
    }
}

// ── Tool implementations ─────────────────────────────────────────────

#[derive(Clone)]
pub struct AppTools {
    pub ctx: McpContext,
    pub tool_router: ToolRouter<Self>,
}

impl ServerHandler for AppTools {}

impl AppTools {
    fn limit(&self, limit: Option<usize>) -> Result<usize, SearchError> {
        let max = self.ctx.config.max_limit;
        match limit.unwrap_or(self.ctx.config.default_limit) {
            n if (1..=max).contains(&n) => Ok(n),
            n => Err(SearchError::InvalidArgument(format!(
                "limit must be between 1 and {max}, got {n}"
            ))),
        }
    }

    fn context_lines(&self, lines: Option<usize>) -> Result<usize, SearchError> {
        let max = self.ctx.config.max_context_lines;
        match lines.unwrap_or(self.ctx.config.default_context_lines) {
            n if n <= max => Ok(n),
            n => Err(SearchError::InvalidArgument(format!(
                "contextLines must be between 0 and {max}, got {n}"
            ))),
        }
    }

    fn page_request(&self, p: SearchParams) -> Result<PageRequest, SearchError> {
        Ok(PageRequest {
            limit: self.limit(p.limit)?,
            context_lines: self.context_lines(p.context_lines)?,
            query: p.query,
            cursor: p.cursor,
        })
    }
}

#[tool_router]
impl AppTools {
    pub fn new(ctx: McpContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tool 1: search_symbols ──────────────────────────────────────

    #[tool(
        description = "Find symbol definitions (functions, classes, methods, types, ...) matching a query. Returns one item per symbol with kind, parent, file, repository, line and column. Paginated: pass nextCursor as cursor to continue."
    )]
    async fn search_symbols(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let req = match self.page_request(params.0) {
            Ok(r) => r,
            Err(e) => return error_result(&e.to_string()),
        };
        page_result(self.ctx.paginator.search_symbols(&req).await)
    }

    // ── Tool 2: search_files ────────────────────────────────────────

    #[tool(
        description = "Find files whose path matches a pattern. Returns file, repository, branches and language only (no content). Paginated: pass nextCursor as cursor to continue."
    )]
    async fn search_files(
        &self,
        params: Parameters<FileSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let req = match self.limit(p.limit) {
            Ok(limit) => PageRequest {
                query: p.query,
                limit,
                context_lines: 0,
                cursor: p.cursor,
            },
            Err(e) => return error_result(&e.to_string()),
        };
        page_result(self.ctx.paginator.search_files(&req).await)
    }

    // ── Tool 3: find_references ─────────────────────────────────────

    #[tool(
        description = "Find where a symbol is defined and used. Definitions come first and carry symbol metadata; usages on a definition line are omitted. Paginated: pass nextCursor as cursor to continue."
    )]
    async fn find_references(
        &self,
        params: Parameters<ReferenceParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let sizes = self
            .limit(p.limit)
            .and_then(|limit| Ok((limit, self.context_lines(p.context_lines)?)));
        let (limit, context_lines) = match sizes {
            Ok(s) => s,
            Err(e) => return error_result(&e.to_string()),
        };

        let req = ReferenceRequest {
            symbol: p.symbol,
            filters: p.filters,
            limit,
            context_lines,
            cursor: p.cursor,
        };
        page_result(self.ctx.paginator.find_references(&req).await)
    }

    // ── Tool 4: search_code ─────────────────────────────────────────

    #[tool(
        description = "Search file contents. The query uses the backend query language (regex, lang:, repo:, file:, case: ...). Returns one item per match with line, column and context. Paginated: pass nextCursor as cursor to continue."
    )]
    async fn search_code(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let req = match self.page_request(params.0) {
            Ok(r) => r,
            Err(e) => return error_result(&e.to_string()),
        };
        page_result(self.ctx.paginator.search_code(&req).await)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{StaticBackend, symbol_files};
    use crate::config::Config;
    use crate::paginate::Paginator;
    use std::sync::Arc;

    fn tools(config: Config) -> AppTools {
        tools_with(StaticBackend::new(), config)
    }

    fn tools_with(backend: StaticBackend, config: Config) -> AppTools {
        AppTools::new(McpContext {
            paginator: Paginator::new(Arc::new(backend)),
            config: Arc::new(config),
        })
    }

    fn result_text(result: &CallToolResult) -> String {
        result.content[0].as_text().unwrap().text.clone()
    }

    #[test]
    fn test_limit_defaults_and_bounds() {
        let t = tools(Config::default());
        assert_eq!(t.limit(None).unwrap(), 30);
        assert_eq!(t.limit(Some(100)).unwrap(), 100);
        assert!(t.limit(Some(0)).is_err());
        assert!(t.limit(Some(101)).is_err());
    }

    #[test]
    fn test_context_lines_bounds() {
        let t = tools(Config::default());
        assert_eq!(t.context_lines(None).unwrap(), 3);
        assert_eq!(t.context_lines(Some(0)).unwrap(), 0);
        assert!(t.context_lines(Some(11)).is_err());
    }

    #[test]
    fn test_page_serialization_is_camel_case() {
        let page: Page<u32> = Page {
            items: vec![1],
            offset: 0,
            limit: 1,
            has_more: true,
            next_cursor: Some("abc".to_string()),
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["hasMore"], true);
        assert_eq!(value["nextCursor"], "abc");
    }

    #[tokio::test]
    async fn test_malformed_cursor_is_tool_error() {
        let t = tools(Config::default());
        let result = t
            .search_symbols(Parameters(SearchParams {
                query: "fn".into(),
                limit: None,
                context_lines: None,
                cursor: Some("!!!".into()),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("invalid cursor format"));
    }

    #[tokio::test]
    async fn test_zero_limit_is_tool_error() {
        let t = tools(Config::default());
        let result = t
            .find_references(Parameters(ReferenceParams {
                symbol: "Run".into(),
                filters: None,
                limit: Some(0),
                context_lines: None,
                cursor: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).contains("limit must be between"));
    }

    #[tokio::test]
    async fn test_search_symbols_returns_page_json() {
        let backend = StaticBackend::new().with_files("sym:fn", symbol_files(10, 1));
        let t = tools_with(backend, Config::default());
        let result = t
            .search_symbols(Parameters(SearchParams {
                query: "fn".into(),
                limit: Some(5),
                context_lines: None,
                cursor: None,
            }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));

        let value: serde_json::Value = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 5);
        assert_eq!(value["hasMore"], true);
        assert!(value["nextCursor"].is_string());
    }
}
