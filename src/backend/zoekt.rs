//! HTTP adapter for a Zoekt-compatible `/api/search` endpoint.
//!
//! Wire types mirror the backend JSON and are converted into
//! [`models`](super::models) once, here, before extraction sees them.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::models::{
    ChunkMatch, FileMatch, LineFragment, LineMatch, Location, Matches, Range, SymbolInfo,
};
use super::{SearchBackend, SearchRequest};
use crate::error::SearchError;

const SEARCH_PATH: &str = "/api/search";

// ── Client ───────────────────────────────────────────────────────────

/// Backend client. Never retries; retry policy belongs to the caller.
#[derive(Clone)]
pub struct ZoektClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ZoektClient {
    /// Create a client for `base_url` (e.g. `http://localhost:6070`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("zoekt-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::BackendUnavailable {
                message: format!("HTTP client build failed: {e}"),
            })?;

        Ok(Self {
            http,
            endpoint: format!("{}{SEARCH_PATH}", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    fn timeout_error(&self) -> SearchError {
        SearchError::BackendTimeout {
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn classify(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            self.timeout_error()
        } else {
            SearchError::BackendUnavailable {
                message: err.to_string(),
            }
        }
    }

    async fn execute(&self, request: &SearchRequest) -> Result<(u16, String), SearchError> {
        let body = WireRequest {
            q: &request.query,
            opts: WireOptions {
                chunk_matches: true,
                max_doc_display_count: request.limit,
                num_context_lines: request.context_lines,
            },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| self.classify(e))?;
        Ok((status, text))
    }
}

#[async_trait]
impl SearchBackend for ZoektClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<FileMatch>, SearchError> {
        debug!(
            query = %request.query,
            limit = request.limit,
            context_lines = request.context_lines,
            "backend search"
        );

        let (status, text) = match tokio::time::timeout(self.timeout, self.execute(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error()),
        }
        .inspect_err(|e| warn!(query = %request.query, "backend call failed: {e}"))?;

        if !(200..300).contains(&status) {
            let message = error_message(&text);
            warn!(query = %request.query, status, "backend rejected query: {message}");
            return Err(SearchError::backend_query(status, message));
        }

        let files = parse_response(&text).map_err(|e| {
            SearchError::backend_query(status, format!("invalid response body: {e}"))
        })?;
        debug!(files = files.len(), "backend returned file matches");
        Ok(files)
    }
}

// ── Wire format ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct WireRequest<'a> {
    #[serde(rename = "Q")]
    q: &'a str,
    #[serde(rename = "Opts")]
    opts: WireOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireOptions {
    chunk_matches: bool,
    max_doc_display_count: usize,
    num_context_lines: usize,
}

/// Either `{"Result": {"Files": [...]}}` or the older top-level `{"Files": [...]}`.
#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireResponse {
    #[serde(default)]
    result: Option<WireResult>,
    #[serde(default)]
    files: Option<Vec<WireFileMatch>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireResult {
    #[serde(default)]
    files: Option<Vec<WireFileMatch>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireFileMatch {
    #[serde(default)]
    repository: String,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    branches: Option<Vec<String>>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    chunk_matches: Option<Vec<WireChunkMatch>>,
    #[serde(default)]
    line_matches: Option<Vec<WireLineMatch>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireChunkMatch {
    #[serde(default)]
    content: String,
    #[serde(default)]
    content_start: WireLocation,
    #[serde(default)]
    file_name: bool,
    #[serde(default)]
    ranges: Option<Vec<WireRange>>,
    #[serde(default)]
    symbol_info: Option<Vec<Option<WireSymbolInfo>>>,
}

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "PascalCase")]
struct WireLocation {
    #[serde(default)]
    byte_offset: u32,
    #[serde(default)]
    line_number: u32,
    #[serde(default)]
    column: u32,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireRange {
    #[serde(default)]
    start: Option<WireLocation>,
    #[serde(default)]
    end: Option<WireLocation>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireSymbolInfo {
    #[serde(default)]
    sym: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    parent: String,
    #[serde(default)]
    parent_kind: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireLineMatch {
    #[serde(default)]
    line: String,
    #[serde(default)]
    line_number: u32,
    #[serde(default)]
    file_name: bool,
    #[serde(default)]
    line_fragments: Option<Vec<WireLineFragment>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct WireLineFragment {
    #[serde(default)]
    line_offset: u32,
    #[serde(default)]
    match_length: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireError {
    error: String,
}

// ── Normalization ────────────────────────────────────────────────────

/// Parse a success body into normalized file matches.
pub(crate) fn parse_response(body: &str) -> Result<Vec<FileMatch>, serde_json::Error> {
    let resp: WireResponse = serde_json::from_str(body)?;
    let files = resp
        .result
        .and_then(|r| r.files)
        .or(resp.files)
        .unwrap_or_default();
    Ok(files.into_iter().map(FileMatch::from).collect())
}

/// Extract the message from an error body, preferring `{"Error": "..."}`.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<WireError>(body) {
        Ok(e) => e.error,
        Err(_) => body.trim().to_string(),
    }
}

impl From<WireLocation> for Location {
    fn from(w: WireLocation) -> Self {
        Self {
            byte_offset: w.byte_offset,
            line: w.line_number,
            column: w.column,
        }
    }
}

impl From<WireFileMatch> for FileMatch {
    fn from(w: WireFileMatch) -> Self {
        let chunks = w.chunk_matches.unwrap_or_default();
        let matches = if chunks.is_empty() {
            Matches::Lines(
                w.line_matches
                    .unwrap_or_default()
                    .into_iter()
                    .map(LineMatch::from)
                    .collect(),
            )
        } else {
            Matches::Chunks(chunks.into_iter().map(ChunkMatch::from).collect())
        };

        Self {
            repository: w.repository,
            file_name: w.file_name,
            branches: w.branches.unwrap_or_default(),
            language: w.language.filter(|l| !l.is_empty()),
            matches,
        }
    }
}

/// A range without `Start` begins at the chunk start; without `End` it ends
/// where it starts.
impl From<WireChunkMatch> for ChunkMatch {
    fn from(w: WireChunkMatch) -> Self {
        let content_start: Location = w.content_start.into();
        Self {
            content: w.content,
            content_start,
            file_name: w.file_name,
            ranges: w
                .ranges
                .unwrap_or_default()
                .into_iter()
                .map(|r| {
                    let start = r.start.map_or(content_start, Location::from);
                    Range {
                        start,
                        end: r.end.map_or(start, Location::from),
                    }
                })
                .collect(),
            symbol_info: w
                .symbol_info
                .unwrap_or_default()
                .into_iter()
                .map(|s| {
                    s.map(|s| SymbolInfo {
                        sym: s.sym,
                        kind: s.kind,
                        parent: s.parent,
                        parent_kind: s.parent_kind,
                    })
                })
                .collect(),
        }
    }
}

impl From<WireLineMatch> for LineMatch {
    fn from(w: WireLineMatch) -> Self {
        Self {
            line: w.line,
            line_number: w.line_number,
            file_name: w.file_name,
            fragments: w
                .line_fragments
                .unwrap_or_default()
                .into_iter()
                .map(|f| LineFragment {
                    line_offset: f.line_offset,
                    match_length: f.match_length,
                })
                .collect(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ContentExtractor, ItemExtractor, SymbolExtractor};

    #[test]
    fn test_parse_chunk_response() {
        let body = r#"{
            "Result": {
                "Files": [{
                    "Repository": "github.com/acme/api",
                    "FileName": "server/handler.go",
                    "Branches": ["main"],
                    "Language": "Go",
                    "ChunkMatches": [{
                        "Content": "ZnVuYyBoYW5kbGVSZXF1ZXN0KCkge30=",
                        "ContentStart": {"ByteOffset": 10, "LineNumber": 4, "Column": 1},
                        "FileName": false,
                        "Ranges": [{
                            "Start": {"ByteOffset": 15, "LineNumber": 4, "Column": 6},
                            "End": {"ByteOffset": 28, "LineNumber": 4, "Column": 19}
                        }],
                        "SymbolInfo": [{"Sym": "handleRequest", "Kind": "func", "Parent": "", "ParentKind": ""}]
                    }]
                }]
            }
        }"#;

        let files = parse_response(body).unwrap();
        assert_eq!(files.len(), 1);
        let file = &files[0];
        assert_eq!(file.repository, "github.com/acme/api");
        assert_eq!(file.branches, vec!["main"]);
        assert_eq!(file.language.as_deref(), Some("Go"));
        let Matches::Chunks(chunks) = &file.matches else {
            panic!("expected chunk matches");
        };
        assert_eq!(chunks[0].content_start.line, 4);
        assert_eq!(chunks[0].ranges[0].start.column, 6);
        assert_eq!(chunks[0].symbol_info[0].as_ref().unwrap().sym, "handleRequest");
    }

    #[test]
    fn test_parse_legacy_envelope_and_line_matches() {
        let body = r#"{
            "Files": [{
                "Repository": "r",
                "FileName": "a.py",
                "Branches": null,
                "ChunkMatches": null,
                "LineMatches": [
                    {"Line": "ZGVmIGYoKTo=", "LineNumber": 3, "FileName": false,
                     "LineFragments": [{"LineOffset": 4, "Offset": 20, "MatchLength": 1}]},
                    {"Line": "YS5weQ==", "LineNumber": 0, "FileName": true}
                ]
            }]
        }"#;

        let files = parse_response(body).unwrap();
        let Matches::Lines(lines) = &files[0].matches else {
            panic!("expected line matches");
        };
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].fragments[0].line_offset, 4);
        assert!(lines[1].file_name);
        assert!(files[0].branches.is_empty());
        assert!(files[0].language.is_none());
    }

    #[test]
    fn test_parse_null_files() {
        assert!(parse_response(r#"{"Result": {"Files": null}}"#).unwrap().is_empty());
        assert!(parse_response("{}").unwrap().is_empty());
    }

    #[test]
    fn test_range_without_start_uses_chunk_start() {
        let body = r#"{"Result": {"Files": [{"Repository": "r", "FileName": "f.go",
            "ChunkMatches": [{"Content": "", "ContentStart": {"LineNumber": 42, "Column": 3},
                "Ranges": [{}, {"Start": {"LineNumber": 43, "Column": 9}}],
                "SymbolInfo": [{"Sym": "x"}, {"Sym": "y"}]}]}]}}"#;
        let files = parse_response(body).unwrap();
        let Matches::Chunks(chunks) = &files[0].matches else {
            panic!("expected chunk matches");
        };
        assert_eq!((chunks[0].ranges[0].start.line, chunks[0].ranges[0].start.column), (42, 3));
        assert_eq!(chunks[0].ranges[1].end, chunks[0].ranges[1].start);

        let symbols = SymbolExtractor.extract(&files);
        assert_eq!((symbols[0].line, symbols[0].column), (42, 3));
        assert_eq!((symbols[1].line, symbols[1].column), (43, 9));

        let sites = ContentExtractor.extract(&files);
        assert_eq!((sites[0].line, sites[0].column), (42, 3));
    }

    #[test]
    fn test_null_symbol_info_entries() {
        let body = r#"{"Result": {"Files": [{"Repository": "r", "FileName": "f",
            "ChunkMatches": [{"Content": "", "Ranges": [{}, {}], "SymbolInfo": [null, {"Sym": "x"}]}]}]}}"#;
        let files = parse_response(body).unwrap();
        let Matches::Chunks(chunks) = &files[0].matches else {
            panic!("expected chunk matches");
        };
        assert!(chunks[0].symbol_info[0].is_none());
        assert_eq!(chunks[0].symbol_info[1].as_ref().unwrap().sym, "x");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"Error": "bad regexp"}"#), "bad regexp");
        assert_eq!(error_message(" plain text \n"), "plain text");
    }

    #[test]
    fn test_request_body_shape() {
        let body = WireRequest {
            q: "sym:foo",
            opts: WireOptions {
                chunk_matches: true,
                max_doc_display_count: 31,
                num_context_lines: 3,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["Q"], "sym:foo");
        assert_eq!(value["Opts"]["ChunkMatches"], true);
        assert_eq!(value["Opts"]["MaxDocDisplayCount"], 31);
        assert_eq!(value["Opts"]["NumContextLines"], 3);
    }
}
