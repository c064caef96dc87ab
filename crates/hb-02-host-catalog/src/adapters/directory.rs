//! Filesystem-backed catalog.
//!
//! Scans the configured directories for `.app` bundles, serves icons from a
//! directory of pre-rendered PNGs and launches applications through an
//! external command.

use crate::domain::entry::{app_name, fallback_icon_file_name, icon_file_name, is_valid_icon_name};
use crate::domain::{AppEntry, CatalogConfig, CatalogError, CatalogResult};
use crate::ports::HostCatalog;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// [`HostCatalog`] over local directories.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    config: CatalogConfig,
}

impl DirectoryCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// First existing icon file for `name`.
    async fn find_icon(&self, name: &str) -> Option<PathBuf> {
        for file_name in [icon_file_name(name), fallback_icon_file_name(name)] {
            let candidate = self.config.icon_dir.join(file_name);
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Some(candidate);
            }
        }
        None
    }

    /// Bundles in one directory, sorted by name. A missing directory is empty.
    async fn scan_dir(&self, dir: &Path) -> CatalogResult<Vec<AppEntry>> {
        let mut read_dir = match tokio::fs::read_dir(dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "App directory missing, skipping");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(dir_entry) = read_dir.next_entry().await? {
            let file_name = dir_entry.file_name();
            let Some(name) = file_name.to_str().and_then(app_name) else {
                continue;
            };
            if !self.config.wants(name) {
                continue;
            }

            entries.push(AppEntry {
                name: name.to_string(),
                app_path: dir_entry.path(),
                icon_path: self.find_icon(name).await,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[async_trait]
impl HostCatalog for DirectoryCatalog {
    async fn list_apps(&self) -> CatalogResult<Vec<AppEntry>> {
        let mut apps = Vec::new();
        for dir in &self.config.app_dirs {
            apps.extend(self.scan_dir(dir).await?);
        }
        debug!(count = apps.len(), "Listed applications");
        Ok(apps)
    }

    async fn icon(&self, name: &str) -> CatalogResult<Vec<u8>> {
        if !is_valid_icon_name(name) {
            return Err(CatalogError::InvalidName(name.to_string()));
        }

        let path = self
            .find_icon(name)
            .await
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            // Removed between the existence check and the read.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CatalogError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn launch(&self, path: &Path) -> CatalogResult<()> {
        if path.as_os_str().is_empty() || !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(CatalogError::InvalidPath(path.to_path_buf()));
        }

        let status = Command::new(&self.config.launcher)
            .arg(path)
            .status()
            .await
            .map_err(|e| {
                warn!(launcher = %self.config.launcher, error = %e, "Launcher failed to start");
                CatalogError::LaunchFailed(e.to_string())
            })?;

        if !status.success() {
            warn!(path = %path.display(), %status, "Launcher exited unsuccessfully");
            return Err(CatalogError::LaunchFailed(status.to_string()));
        }

        info!(path = %path.display(), "Application launched");
        Ok(())
    }
}
