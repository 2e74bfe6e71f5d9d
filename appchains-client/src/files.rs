//! Download and save of generated report files

use std::path::{Path, PathBuf};

use appchains_core::domain::report::FileValue;
use tracing::{debug, info};

use crate::AppChainsClient;
use crate::error::Result;
use crate::transport::HttpRequest;

impl AppChainsClient {
    /// Download the content of a file result
    pub async fn fetch_file(&self, file: &FileValue) -> Result<Vec<u8>> {
        debug!("Downloading {} from {}", file.name, file.url);
        let response = self
            .send_authenticated(HttpRequest::get(file.url.clone()))
            .await?;
        Ok(Self::expect_success(response)?.body)
    }

    /// Download a file result and write it to `path`
    ///
    /// Missing parent directories are created and an existing file at
    /// `path` is replaced.
    ///
    /// # Returns
    /// The path the file was written to
    pub async fn save_file_as(&self, file: &FileValue, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let content = self.fetch_file(file).await?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &content).await?;

        info!("Saved {} ({} bytes) to {}", file.name, content.len(), path.display());
        Ok(path.to_path_buf())
    }

    /// Download a file result into `dir` under its suggested name
    pub async fn save_file_to(&self, file: &FileValue, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&file.name);
        self.save_file_as(file, path).await
    }
}
