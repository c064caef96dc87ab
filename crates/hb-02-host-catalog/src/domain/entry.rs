//! Catalog entries and icon naming.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bundle suffix of an application directory
pub const APP_SUFFIX: &str = ".app";

/// One launchable application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    /// Display name (bundle directory name without `.app`)
    pub name: String,
    /// Absolute path of the bundle; what `/launch` expects back
    pub app_path: PathBuf,
    /// Pre-rendered PNG icon, if one exists
    pub icon_path: Option<PathBuf>,
}

/// Icon file name for an application: spaces become underscores.
///
/// `"GitHub Desktop"` → `"GitHub_Desktop.png"`
pub fn icon_file_name(name: &str) -> String {
    format!("{}.png", name.replace(' ', "_"))
}

/// Lower-case fallback icon name (`"Mail"` → `"mail.png"`).
pub fn fallback_icon_file_name(name: &str) -> String {
    format!("{}.png", name.to_lowercase())
}

/// Application name from a bundle directory name, or `None` if it is not
/// an `.app` bundle.
pub fn app_name(dir_name: &str) -> Option<&str> {
    dir_name
        .strip_suffix(APP_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// An icon lookup name must be a single path component.
pub fn is_valid_icon_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
        && !name.contains("..")
}
