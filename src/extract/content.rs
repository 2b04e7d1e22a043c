//! Plain content hits, one per match range or legacy line match.
use super::{ContentMatch, ItemExtractor, decode_content};
use crate::backend::FileMatch;
use crate::backend::models::Matches;

pub struct ContentExtractor;

impl ItemExtractor for ContentExtractor {
    type Item = ContentMatch;

    fn extract(&self, files: &[FileMatch]) -> Vec<ContentMatch> {
        match_sites(files)
    }
}

/// Every content match site across both match shapes. Filename-only matches
/// are skipped.
pub(crate) fn match_sites(files: &[FileMatch]) -> Vec<ContentMatch> {
    let mut out = Vec::new();
    for file in files {
        let site = |line: u32, column: u32, context: String| ContentMatch {
            file: file.file_name.clone(),
            repository: file.repository.clone(),
            line,
            column,
            context,
        };

        match &file.matches {
            Matches::Chunks(chunks) => {
                for chunk in chunks.iter().filter(|c| !c.file_name) {
                    let context = decode_content(&chunk.content);
                    if chunk.ranges.is_empty() {
                        let start = chunk.content_start;
                        out.push(site(start.line, start.column, context));
                        continue;
                    }
                    for range in &chunk.ranges {
                        out.push(site(range.start.line, range.start.column, context.clone()));
                    }
                }
            }
            Matches::Lines(lines) => {
                for line in lines.iter().filter(|l| !l.file_name) {
                    let column = line.fragments.first().map_or(1, |f| f.line_offset + 1);
                    out.push(site(line.line_number, column, decode_content(&line.line)));
                }
            }
        }
    }
    out
}
