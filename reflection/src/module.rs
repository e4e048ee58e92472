//! Module manifest: which headers each module declares, and which classes
//! each header declares.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Leading header directories that are not part of an include path.
const INCLUDE_ROOTS: &[&str] = &["Public", "Classes", "Private"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub base_directory: PathBuf,
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub path: PathBuf,
    /// C++ names of the classes declared in the header.
    #[serde(default)]
    pub classes: Vec<String>,
}

impl ModuleEntry {
    pub fn header_path(&self, header: &HeaderEntry) -> PathBuf {
        if header.path.is_absolute() {
            header.path.clone()
        } else {
            self.base_directory.join(&header.path)
        }
    }

    /// Path to use in an `#include` directive for the header.
    pub fn include_path(&self, header: &HeaderEntry) -> String {
        let relative = if header.path.is_absolute() {
            header
                .path
                .strip_prefix(&self.base_directory)
                .unwrap_or_else(|_| Path::new(header.path.file_name().unwrap_or_default()))
        } else {
            header.path.as_path()
        };

        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let skip = match parts.first() {
            Some(first) if parts.len() > 1 && INCLUDE_ROOTS.contains(&first.as_str()) => 1,
            _ => 0,
        };
        parts[skip..].join("/")
    }
}
