// Local filesystem adapter - File system operations backed by std::fs and walkdir

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::path::has_media_extension;
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(Path::new(file_path).is_file())
    }

    async fn directory_exists(&self, dir_path: &str) -> Result<bool, DomainError> {
        Ok(Path::new(dir_path).is_dir())
    }

    async fn get_file_size(&self, file_path: &str) -> Result<u64, DomainError> {
        let metadata = fs::metadata(file_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    async fn read_to_string(&self, file_path: &str) -> Result<String, DomainError> {
        fs::read_to_string(file_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read {}: {}", file_path, e)))
    }

    async fn list_files(
        &self,
        dir_path: &str,
        extensions: &[String],
    ) -> Result<Vec<String>, DomainError> {
        if !Path::new(dir_path).is_dir() {
            return Err(DomainError::FsFail(format!(
                "Not a directory: {}",
                dir_path
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir_path).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && has_media_extension(entry.path(), extensions) {
                files.push(entry.path().to_string_lossy().to_string());
            }
        }

        files.sort();
        Ok(files)
    }
}
