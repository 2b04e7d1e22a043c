//! Symbol extraction from symbol-tagged chunk matches.
use super::{ItemExtractor, Symbol, SymbolKind};
use crate::backend::FileMatch;
use crate::backend::models::{ChunkMatch, Matches};

pub struct SymbolExtractor;

impl ItemExtractor for SymbolExtractor {
    type Item = Symbol;

    fn extract(&self, files: &[FileMatch]) -> Vec<Symbol> {
        files
            .iter()
            .flat_map(|file| chunks(file).iter().map(move |chunk| (file, chunk)))
            .flat_map(|(file, chunk)| chunk_symbols(file, chunk))
            .collect()
    }
}

pub(crate) fn chunks(file: &FileMatch) -> &[ChunkMatch] {
    match &file.matches {
        Matches::Chunks(chunks) => chunks,
        Matches::Lines(_) => &[],
    }
}

/// Symbols of one chunk. `symbol_info[i]` pairs with `ranges[i]`; the chunk
/// start is used when the range is missing.
pub(crate) fn chunk_symbols(file: &FileMatch, chunk: &ChunkMatch) -> Vec<Symbol> {
    chunk
        .symbol_info
        .iter()
        .enumerate()
        .filter_map(|(i, info)| {
            let info = info.as_ref().filter(|s| !s.sym.is_empty())?;
            let start = chunk.ranges.get(i).map_or(chunk.content_start, |r| r.start);
            let has_parent = !info.parent.is_empty();

            Some(Symbol {
                name: info.sym.clone(),
                kind: SymbolKind::normalize(&info.kind),
                parent: has_parent.then(|| info.parent.clone()),
                parent_kind: has_parent.then(|| SymbolKind::normalize(&info.parent_kind)),
                file: file.file_name.clone(),
                repository: file.repository.clone(),
                line: start.line,
                column: start.column,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{chunk_file, symbol_chunk, symbol_files};
    use crate::backend::models::{LineMatch, Location, SymbolInfo};

    #[test]
    fn test_one_symbol_per_tagged_range() {
        let files = symbol_files(3, 5);
        let symbols = SymbolExtractor.extract(&files);
        assert_eq!(symbols.len(), 15);
        assert_eq!(symbols[0].name, "fn_0_0");
        assert_eq!(symbols[5].name, "fn_1_0");
        assert_eq!(symbols[5].file, "src/file_1.go");
        assert_eq!(symbols[14].line, 5);
        assert!(symbols.iter().all(|s| s.kind == SymbolKind::Function));
    }

    #[test]
    fn test_skips_missing_and_empty_symbol_info() {
        let mut chunk = symbol_chunk("x", &[("a", "func", 1), ("b", "func", 2), ("c", "func", 3)]);
        chunk.symbol_info[0] = None;
        chunk.symbol_info[1] = Some(SymbolInfo::default());
        let symbols = SymbolExtractor.extract(&[chunk_file("r", "f.go", vec![chunk])]);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "c");
        assert_eq!(symbols[0].line, 3);
    }

    #[test]
    fn test_falls_back_to_chunk_start() {
        let mut chunk = symbol_chunk("x", &[("a", "class", 1)]);
        chunk.ranges.clear();
        chunk.content_start = Location {
            byte_offset: 0,
            line: 42,
            column: 7,
        };
        let symbols = SymbolExtractor.extract(&[chunk_file("r", "f.py", vec![chunk])]);
        assert_eq!((symbols[0].line, symbols[0].column), (42, 7));
        assert_eq!(symbols[0].kind, SymbolKind::Class);
    }

    #[test]
    fn test_parent_only_when_named() {
        let mut chunk = symbol_chunk("x", &[("serve", "method", 10), ("helper", "func", 20)]);
        chunk.symbol_info[0] = Some(SymbolInfo {
            sym: "serve".to_string(),
            kind: "member".to_string(),
            parent: "Server".to_string(),
            parent_kind: "struct".to_string(),
        });
        chunk.symbol_info[1] = Some(SymbolInfo {
            sym: "helper".to_string(),
            kind: "func".to_string(),
            parent: String::new(),
            parent_kind: "struct".to_string(),
        });
        let symbols = SymbolExtractor.extract(&[chunk_file("r", "s.go", vec![chunk])]);
        assert_eq!(symbols[0].kind, SymbolKind::Method);
        assert_eq!(symbols[0].parent.as_deref(), Some("Server"));
        assert_eq!(symbols[0].parent_kind, Some(SymbolKind::Class));
        assert!(symbols[1].parent.is_none());
        assert!(symbols[1].parent_kind.is_none());
    }

    #[test]
    fn test_line_matches_have_no_symbols() {
        let mut file = chunk_file("r", "f", vec![]);
        file.matches = Matches::Lines(vec![LineMatch::default()]);
        assert!(SymbolExtractor.extract(&[file]).is_empty());
    }
}
