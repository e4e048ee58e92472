//! Class name → declaring header lookup.

use crate::error::{GenError, Result};
use replicator_reflection::ModuleManifest;
use std::collections::HashMap;
use std::path::PathBuf;

/// Where a class is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLocation {
    pub module: String,
    pub path: PathBuf,
    /// Path relative to the module's include roots, for `#include`.
    pub include_path: String,
}

/// Resolves C++ class names to the header that declares them.
///
/// The lookup table is built once by [`ModuleResolver::load_manifest`];
/// resolving before that fails with [`GenError::NotPrimed`].
#[derive(Debug, Default)]
pub struct ModuleResolver {
    headers: Option<HashMap<String, HeaderLocation>>,
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primed(manifest: &ModuleManifest) -> Self {
        let mut resolver = Self::new();
        resolver.load_manifest(manifest);
        resolver
    }

    pub fn load_manifest(&mut self, manifest: &ModuleManifest) {
        let mut headers: HashMap<String, HeaderLocation> = HashMap::new();

        for module in &manifest.modules {
            for header in &module.headers {
                let location = HeaderLocation {
                    module: module.name.clone(),
                    path: module.header_path(header),
                    include_path: module.include_path(header),
                };
                for class_name in &header.classes {
                    if let Some(existing) = headers.get(class_name) {
                        tracing::warn!(
                            class = %class_name,
                            kept = %existing.path.display(),
                            ignored = %location.path.display(),
                            "class declared by more than one header"
                        );
                        continue;
                    }
                    headers.insert(class_name.clone(), location.clone());
                }
            }
        }

        tracing::debug!(classes = headers.len(), "module manifest loaded");
        self.headers = Some(headers);
    }

    pub fn is_primed(&self) -> bool {
        self.headers.is_some()
    }

    pub fn resolve(&self, class_name: &str) -> Result<&HeaderLocation> {
        let headers = self.headers.as_ref().ok_or(GenError::NotPrimed)?;
        headers
            .get(class_name)
            .ok_or_else(|| GenError::NotFound(format!("no module declares class {}", class_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replicator_reflection::{HeaderEntry, ModuleEntry};

    fn manifest() -> ModuleManifest {
        ModuleManifest {
            modules: vec![
                ModuleEntry {
                    name: "Game".to_string(),
                    base_directory: PathBuf::from("/proj/Source/Game"),
                    headers: vec![HeaderEntry {
                        path: PathBuf::from("Public/Door.h"),
                        classes: vec!["ADoor".to_string(), "UDoorHinge".to_string()],
                    }],
                },
                ModuleEntry {
                    name: "Plugin".to_string(),
                    base_directory: PathBuf::from("/proj/Plugins/Plugin"),
                    headers: vec![HeaderEntry {
                        path: PathBuf::from("Classes/Door.h"),
                        classes: vec!["ADoor".to_string()],
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_resolve_before_priming() {
        let resolver = ModuleResolver::new();
        assert!(matches!(resolver.resolve("ADoor"), Err(GenError::NotPrimed)));
    }

    #[test]
    fn test_resolve_known_class() {
        let resolver = ModuleResolver::primed(&manifest());
        let location = resolver.resolve("UDoorHinge").expect("hinge should resolve");
        assert_eq!(location.module, "Game");
        assert_eq!(location.path, PathBuf::from("/proj/Source/Game/Public/Door.h"));
        assert_eq!(location.include_path, "Door.h");
    }

    #[test]
    fn test_first_declaration_wins() {
        let resolver = ModuleResolver::primed(&manifest());
        let location = resolver.resolve("ADoor").expect("door should resolve");
        assert_eq!(location.module, "Game");
    }

    #[test]
    fn test_resolve_unknown_class() {
        let resolver = ModuleResolver::primed(&manifest());
        let err = resolver.resolve("AWindow").expect_err("window is not declared");
        assert!(matches!(err, GenError::NotFound(_)));
        assert!(err.to_string().contains("AWindow"));
    }
}
