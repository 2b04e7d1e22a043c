//! MCP Server setup using `rmcp` with stdio transport.
//!
//! Provides `McpContext` (shared state) and `McpServer` (startup logic).
//! Four tools are registered: `search_symbols`, `search_files`,
//! `find_references` and `search_code`. Each returns one page plus an opaque
//! `nextCursor`; the server keeps nothing between calls, so any cursor can be
//! replayed against any instance. Stdio is the only transport.
use crate::mcp::tools::AppTools;
use anyhow::{Context, Result};
use rmcp::{ServiceExt, handler::server::router::Router, transport::io::stdio};
use std::sync::Arc;

use crate::{config::Config, paginate::Paginator};

/// Shared application context available to all tool handlers.
///
/// Holds no per-request state; every tool call builds its own page.
#[derive(Clone)]
pub struct McpContext {
    pub paginator: Paginator,
    pub config: Arc<Config>,
}

/// MCP Server wrapping the context and serving via stdio.
#[derive(Clone)]
pub struct McpServer {
    pub ctx: McpContext,
}

impl McpServer {
    pub fn new(ctx: McpContext) -> Self {
        Self { ctx }
    }

    /// Start the MCP server on stdio transport (blocks until the client disconnects).
    pub async fn start(self) -> Result<()> {
        tracing::info!("Starting MCP server on stdio...");
        let (stdin, stdout) = stdio();

        let app_tools = AppTools::new(self.ctx.clone());
        let router = Router::new(app_tools.clone()).with_tools(app_tools.tool_router.clone());

        let service = router
            .serve((stdin, stdout))
            .await
            .context("MCP Server failed to initialize stdio transport")?;
        service
            .waiting()
            .await
            .context("MCP Server encountered an error during stdio transport")?;

        Ok(())
    }
}
