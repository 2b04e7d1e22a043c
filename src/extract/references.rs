//! Definition and usage sites for the reference-finding path.
use super::symbols::{chunk_symbols, chunks};
use super::{ItemExtractor, ReferenceKind, ReferenceResult, decode_content};
use crate::backend::FileMatch;

/// Definitions from a symbol-mode response. Each keeps its full symbol.
pub struct DefinitionExtractor;

/// Usages from a plain content response. No symbol metadata is attached.
pub struct UsageExtractor;

impl ItemExtractor for DefinitionExtractor {
    type Item = ReferenceResult;

    fn extract(&self, files: &[FileMatch]) -> Vec<ReferenceResult> {
        let mut out = Vec::new();
        for file in files {
            for chunk in chunks(file) {
                let context = decode_content(&chunk.content);
                for symbol in chunk_symbols(file, chunk) {
                    out.push(ReferenceResult {
                        kind: ReferenceKind::Definition,
                        file: symbol.file.clone(),
                        repository: symbol.repository.clone(),
                        line: symbol.line,
                        column: symbol.column,
                        context: context.clone(),
                        symbol: Some(symbol),
                    });
                }
            }
        }
        out
    }
}

impl ItemExtractor for UsageExtractor {
    type Item = ReferenceResult;

    fn extract(&self, files: &[FileMatch]) -> Vec<ReferenceResult> {
        super::content::match_sites(files)
            .into_iter()
            .map(|site| ReferenceResult {
                kind: ReferenceKind::Usage,
                file: site.file,
                repository: site.repository,
                line: site.line,
                column: site.column,
                context: site.context,
                symbol: None,
            })
            .collect()
    }
}
