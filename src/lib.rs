//! # zoekt-mcp — Zoekt code search as paginated MCP tools
//!
//! Exposes a remote Zoekt-compatible search backend as item-level,
//! cursor-paginated tools over the Model Context Protocol (MCP).
//!
//! ## Architecture
//!
//! - **[`query`]** — Query rewriting into symbol and filename modes
//! - **[`cursor`]** — Opaque, query-bound pagination cursors
//! - **[`backend`]** — `SearchBackend` seam, HTTP adapter and normalized match model
//! - **[`extract`]** — Symbol, file, reference and content item extraction plus dedup
//! - **[`paginate`]** — Cursor validation, inflated fetch, slicing and next-cursor logic
//! - **[`mcp`]** — MCP server with 4 tool handlers (stdio transport via rmcp)
//! - **[`config`]** — Configuration loading and validation
//! - **[`error`]** — Error taxonomy and backend error hints

pub mod backend;
pub mod config;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod mcp;
pub mod paginate;
pub mod query;
