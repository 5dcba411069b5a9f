//! Per-route persisted filter cache.
//!
//! The cache behaves like browser local storage: one string entry per route,
//! holding the serialized non-default filters of that route. The store owns
//! (de)serialization of entries so it can treat corrupt content as absent.
//!
//! [`FileCache`] keeps every route in a single JSON file in the
//! platform-specific configuration folder:
//! - macOS: ~/Library/Application Support/com.interflow.Interflow/
//! - Windows: %APPDATA%/interflow/Interflow/config/
//! - Linux: ~/.config/interflow/

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{FilterError, Result};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "interflow";
const APP_NAME: &str = "Interflow";
const CACHE_FILENAME: &str = "filters.json";

/// Route-keyed string storage.
pub trait FilterCache {
    fn read(&self, route: &str) -> Result<Option<String>>;
    fn write(&mut self, route: &str, entry: &str) -> Result<()>;
    fn remove(&mut self, route: &str) -> Result<()>;
}

/// Cache held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCache {
    entries: BTreeMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, route: &str) -> Option<&str> {
        self.entries.get(route).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FilterCache for MemoryCache {
    fn read(&self, route: &str) -> Result<Option<String>> {
        Ok(self.entries.get(route).cloned())
    }

    fn write(&mut self, route: &str, entry: &str) -> Result<()> {
        self.entries.insert(route.to_string(), entry.to_string());
        Ok(())
    }

    fn remove(&mut self, route: &str) -> Result<()> {
        self.entries.remove(route);
        Ok(())
    }
}

/// Get the default path of the filter cache file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn default_cache_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CACHE_FILENAME))
}

/// Cache stored as one JSON object (`route -> entry`) on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache at [`default_cache_path`].
    pub fn open_default() -> Result<Self> {
        default_cache_path()
            .map(Self::new)
            .ok_or(FilterError::NoCacheLocation)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored route entry.
    ///
    /// A missing file is an empty cache; so is a file that is not a JSON
    /// object of strings, which gets overwritten on the next write.
    pub fn entries(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(FilterError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt filter cache file, ignoring");
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|source| FilterError::Serialization { source })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| FilterError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Write to a temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|e| FilterError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(content.as_bytes())
            .map_err(|e| FilterError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;
        file.sync_all().map_err(|e| FilterError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| FilterError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source: e,
        })?;

        tracing::info!("Saved filter cache to {}", self.path.display());
        Ok(())
    }
}

impl FilterCache for FileCache {
    fn read(&self, route: &str) -> Result<Option<String>> {
        Ok(self.entries()?.remove(route))
    }

    fn write(&mut self, route: &str, entry: &str) -> Result<()> {
        let mut entries = self.entries()?;
        if entries.get(route).map(String::as_str) == Some(entry) {
            return Ok(());
        }
        entries.insert(route.to_string(), entry.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, route: &str) -> Result<()> {
        let mut entries = self.entries()?;
        if entries.remove(route).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}
