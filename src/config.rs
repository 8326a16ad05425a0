//! Data directory layout and tunables

use crate::search::DEFAULT_SEARCH_LIMIT;
#[cfg(debug_assertions)]
use std::path::Path;
use std::path::PathBuf;

/// Default search cache capacity (number of distinct queries)
pub const DEFAULT_SEARCH_CACHE_CAPACITY: usize = 64;

/// Bible asset location relative to the data directory
pub const ASSET_RELATIVE_PATH: &str = "bibles/kjv.json";

pub const SETTINGS_DB_NAME: &str = "settings.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub asset_path: PathBuf,
    /// `sha256:<hex>` or bare hex; unchecked when `None`
    pub asset_sha256: Option<String>,
    pub settings_db_path: PathBuf,
    pub search_cache_capacity: usize,
    pub default_search_limit: usize,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            asset_path: data_dir.join(ASSET_RELATIVE_PATH),
            asset_sha256: None,
            settings_db_path: data_dir.join(SETTINGS_DB_NAME),
            search_cache_capacity: DEFAULT_SEARCH_CACHE_CAPACITY,
            default_search_limit: DEFAULT_SEARCH_LIMIT,
            data_dir,
        }
    }

    pub fn with_asset_sha256(mut self, hash: impl Into<String>) -> Self {
        self.asset_sha256 = Some(hash.into());
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(get_data_dir())
    }
}

#[cfg(debug_assertions)]
fn has_asset(dir: &Path) -> bool {
    dir.join(ASSET_RELATIVE_PATH).exists()
}

/// Get the data directory
///
/// - Development: `data/` in the working directory or next to the project root
/// - Otherwise: platform data dir (`~/.local/share/ScriptureFlow`, ...)
pub fn get_data_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        let dev_paths = [PathBuf::from("data"), PathBuf::from("../data")];
        for path in &dev_paths {
            if has_asset(path) {
                return path.canonicalize().unwrap_or_else(|_| path.clone());
            }
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("ScriptureFlow");
    }

    // Fallback to current working directory
    PathBuf::from("data")
}
