//! Drops usages that sit on a definition line.
//!
//! The key is `repository:file:line`; column is not part of it, so a usage on
//! the same line as a definition is dropped even at a different column.
use std::collections::HashSet;

use super::ReferenceResult;

fn site_key(r: &ReferenceResult) -> String {
    format!("{}:{}:{}", r.repository, r.file, r.line)
}

/// Remove usages whose key matches any definition's key. Order is preserved.
#[must_use]
pub fn deduplicate(
    definitions: &[ReferenceResult],
    usages: Vec<ReferenceResult>,
) -> Vec<ReferenceResult> {
    let seen: HashSet<String> = definitions.iter().map(site_key).collect();
    usages
        .into_iter()
        .filter(|u| !seen.contains(&site_key(u)))
        .collect()
}
