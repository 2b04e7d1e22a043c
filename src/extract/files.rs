//! One metadata record per matched file.
use super::{FileResult, ItemExtractor};
use crate::backend::FileMatch;

pub struct FileExtractor;

impl ItemExtractor for FileExtractor {
    type Item = FileResult;

    fn extract(&self, files: &[FileMatch]) -> Vec<FileResult> {
        files
            .iter()
            .map(|f| FileResult {
                file: f.file_name.clone(),
                repository: f.repository.clone(),
                branches: f.branches.clone(),
                language: f.language.clone(),
            })
            .collect()
    }
}
