//! Query rewriting into backend search modes.
//!
//! Both rewrites are idempotent: applying one twice yields the same string as
//! applying it once.

/// Prefix that switches the backend into symbol-only matching.
pub const SYMBOL_MARKER: &str = "sym:";

/// Prefix that switches the backend into filename-only matching.
pub const FILENAME_MARKER: &str = "file:";

/// Short alias of [`FILENAME_MARKER`].
pub const FILENAME_MARKER_SHORT: &str = "f:";

/// Filter operators that are passed through untouched.
const FILTER_OPERATORS: &[&str] = &[
    "lang:", "l:", "repo:", "r:", "file:", "f:", "branch:", "b:", "case:", "c:", "sym:", "type:",
    "t:", "archived:", "a:",
];

/// Whether a token is a filter (optionally negated, e.g. `-file:_test.go`).
fn is_filter_token(token: &str) -> bool {
    let bare = token.strip_prefix('-').unwrap_or(token);
    FILTER_OPERATORS
        .iter()
        .any(|op| bare.len() > op.len() && bare.starts_with(op))
}

/// Rewrite a query so that free text only matches symbol definitions.
///
/// Free-text tokens are joined behind [`SYMBOL_MARKER`]; filter tokens are
/// kept and appended afterwards in their original order.
#[must_use]
pub fn wrap_symbol_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.starts_with(SYMBOL_MARKER) {
        return trimmed.to_string();
    }

    let (filters, terms): (Vec<&str>, Vec<&str>) =
        trimmed.split_whitespace().partition(|t| is_filter_token(t));

    if terms.is_empty() {
        return format!("{SYMBOL_MARKER}{trimmed}");
    }

    let mut wrapped = format!("{SYMBOL_MARKER}{}", terms.join(" "));
    for filter in filters {
        wrapped.push(' ');
        wrapped.push_str(filter);
    }
    wrapped
}

/// Rewrite a query so that it only matches file paths.
#[must_use]
pub fn wrap_filename_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.starts_with(FILENAME_MARKER) || trimmed.starts_with(FILENAME_MARKER_SHORT) {
        trimmed.to_string()
    } else {
        format!("{FILENAME_MARKER}{trimmed}")
    }
}

/// Plain content query for a symbol plus caller-supplied filters.
#[must_use]
pub fn content_query(term: &str, filters: Option<&str>) -> String {
    match filters.map(str::trim).filter(|f| !f.is_empty()) {
        Some(f) => format!("{} {f}", term.trim()),
        None => term.trim().to_string(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
