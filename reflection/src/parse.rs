//! Loading reflection snapshots and module manifests from JSON

use crate::error::ReflectionError;
use crate::module::ModuleManifest;
use crate::provider::ReflectionSnapshot;
use crate::types::ClassDescriptor;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    classes: Vec<ClassDescriptor>,
}

pub fn parse_snapshot_file<P: AsRef<Path>>(path: P) -> Result<ReflectionSnapshot, ReflectionError> {
    let content = read(path.as_ref())?;
    parse_snapshot_content(&content)
}

pub fn parse_snapshot_content(content: &str) -> Result<ReflectionSnapshot, ReflectionError> {
    let file: SnapshotFile =
        serde_json::from_str(content).map_err(|source| ReflectionError::Parse {
            what: "reflection snapshot".to_string(),
            source,
        })?;
    tracing::debug!(classes = file.classes.len(), "reflection snapshot parsed");
    ReflectionSnapshot::new(file.classes)
}

pub fn parse_module_manifest_file<P: AsRef<Path>>(
    path: P,
) -> Result<ModuleManifest, ReflectionError> {
    let content = read(path.as_ref())?;
    parse_module_manifest_content(&content)
}

pub fn parse_module_manifest_content(content: &str) -> Result<ModuleManifest, ReflectionError> {
    let manifest: ModuleManifest =
        serde_json::from_str(content).map_err(|source| ReflectionError::Parse {
            what: "module manifest".to_string(),
            source,
        })?;
    tracing::debug!(modules = manifest.modules.len(), "module manifest parsed");
    Ok(manifest)
}

fn read(path: &Path) -> Result<String, ReflectionError> {
    fs::read_to_string(path).map_err(|source| ReflectionError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ReflectionProvider;
    use crate::types::{ClassKind, PropertyAccess, PropertyType, RpcKind};

    #[test]
    fn test_snapshot_parses_classes() {
        let json = r#"{
            "classes": [
                {
                    "name": "Door",
                    "cpp_prefix": "A",
                    "path": "/Script/MyGame.Door",
                    "package": "/Script/MyGame",
                    "module": "MyGame",
                    "properties": [
                        { "name": "bIsOpen", "type": { "kind": "bool" } },
                        { "name": "Angle", "type": { "kind": "float" }, "access": "private" }
                    ],
                    "rpcs": [
                        {
                            "name": "ServerOpen",
                            "kind": "server",
                            "reliable": true,
                            "params": [ { "name": "Speed", "type": { "kind": "float" } } ]
                        }
                    ],
                    "components": ["/Script/MyGame.HingeComponent"]
                },
                {
                    "name": "HingeComponent",
                    "cpp_prefix": "U",
                    "path": "/Script/MyGame.HingeComponent",
                    "kind": "component"
                }
            ]
        }"#;

        let snapshot = parse_snapshot_content(json).expect("should parse snapshot");
        assert_eq!(snapshot.classes().len(), 2);

        let door = snapshot.class("/Script/MyGame.Door").expect("door should exist");
        assert_eq!(door.properties.len(), 2);
        assert_eq!(door.properties[1].access, PropertyAccess::Private);
        assert_eq!(door.properties[0].ty, PropertyType::Bool);
        assert_eq!(door.rpcs[0].kind, RpcKind::Server);
        assert_eq!(door.components, vec!["/Script/MyGame.HingeComponent"]);

        let hinge = snapshot
            .class("/Script/MyGame.HingeComponent")
            .expect("hinge should exist");
        assert_eq!(hinge.kind, ClassKind::Component);
    }

    #[test]
    fn test_malformed_snapshot() {
        let err = parse_snapshot_content("{ not json").expect_err("should fail");
        assert!(err.to_string().contains("reflection snapshot"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_module_manifest_file("/definitely/not/here.json").expect_err("should fail");
        assert!(matches!(err, ReflectionError::Io { .. }));
    }
}
