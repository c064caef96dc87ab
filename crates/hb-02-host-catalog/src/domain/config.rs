//! Catalog configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Applications listed when no allow-list is configured.
pub const DEFAULT_WANTED_APPS: &[&str] = &[
    "Safari",
    "Brave",
    "Chess",
    "Blender",
    "GitHub Desktop",
    "Xcode",
    "Notes",
    "Mail",
    "Messages",
    "Calculator",
];

/// Default launcher command
pub const DEFAULT_LAUNCHER: &str = "open";

/// Host catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directories scanned for `.app` bundles, in order
    pub app_dirs: Vec<PathBuf>,
    /// Names to include; empty lists everything
    pub wanted_apps: Vec<String>,
    /// Directory of pre-rendered PNG icons
    pub icon_dir: PathBuf,
    /// Program run as `<launcher> <app path>`
    pub launcher: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let mut app_dirs = vec![
            PathBuf::from("/Applications"),
            PathBuf::from("/System/Applications"),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            app_dirs.push(PathBuf::from(home).join("Applications"));
        }

        Self {
            app_dirs,
            wanted_apps: DEFAULT_WANTED_APPS.iter().map(|s| s.to_string()).collect(),
            icon_dir: PathBuf::from("app_icons"),
            launcher: DEFAULT_LAUNCHER.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Whether `name` passes the allow-list.
    pub fn wants(&self, name: &str) -> bool {
        self.wanted_apps.is_empty() || self.wanted_apps.iter().any(|w| w == name)
    }
}
