//! Record of the last successful generation run.

use crate::error::{GenError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedManifest {
    pub generated_time: DateTime<Utc>,
    pub proto_package_name: String,
}

const GENERATED_TIME_KEY: &str = "GeneratedTime";
const PROTO_PACKAGE_NAME_KEY: &str = "ProtoPackageName";

impl GeneratedManifest {
    /// A manifest stamped with the current time, at second precision.
    pub fn now(proto_package_name: impl Into<String>) -> Self {
        Self {
            generated_time: from_unix(Utc::now().timestamp()),
            proto_package_name: proto_package_name.into(),
        }
    }

    /// Whether outputs recorded by this manifest need regenerating.
    pub fn is_stale(&self, proto_package_name: &str, inputs_modified: Option<DateTime<Utc>>) -> bool {
        self.proto_package_name != proto_package_name
            || inputs_modified.is_some_and(|modified| modified > self.generated_time)
    }
}

fn from_unix(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
}

/// Loads and saves the generated manifest at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<GeneratedManifest> {
        let content = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                GenError::NotFound(format!("generated manifest {}", self.path.display()))
            } else {
                GenError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let fields: Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| GenError::Malformed {
                what: format!("generated manifest {}", self.path.display()),
                reason: e.to_string(),
            })?;

        let generated_time = match fields.get(GENERATED_TIME_KEY).and_then(Value::as_f64) {
            Some(seconds) => from_unix(seconds as i64),
            None => {
                tracing::warn!(
                    path = %self.path.display(),
                    "generated manifest has no usable GeneratedTime"
                );
                DateTime::<Utc>::default()
            }
        };
        let proto_package_name = match fields.get(PROTO_PACKAGE_NAME_KEY).and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!(
                    path = %self.path.display(),
                    "generated manifest has no usable ProtoPackageName"
                );
                String::new()
            }
        };

        Ok(GeneratedManifest {
            generated_time,
            proto_package_name,
        })
    }

    /// Write the manifest through a temporary file in the same directory
    /// and rename it into place.
    pub fn save(&self, manifest: &GeneratedManifest) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(GenError::DirMissing(dir.to_path_buf()));
        }

        let mut fields = Map::new();
        fields.insert(
            GENERATED_TIME_KEY.to_string(),
            Value::from(manifest.generated_time.timestamp()),
        );
        fields.insert(
            PROTO_PACKAGE_NAME_KEY.to_string(),
            Value::from(manifest.proto_package_name.as_str()),
        );
        let json = serde_json::to_string_pretty(&fields).map_err(|e| GenError::Malformed {
            what: "generated manifest".to_string(),
            reason: e.to_string(),
        })?;

        let write_failed = |source: std::io::Error| GenError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(json.as_bytes()).map_err(write_failed)?;
        tmp.persist(&self.path).map_err(|e| write_failed(e.error))?;

        tracing::debug!(path = %self.path.display(), "generated manifest saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ManifestStore::new(dir.path().join("GeneratedManifest.json"));
        let manifest = GeneratedManifest::now("gamepb");

        store.save(&manifest).expect("save should succeed");
        let loaded = store.load().expect("load should succeed");
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_load_missing_names_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.json");
        let err = ManifestStore::new(&path).load().expect_err("should be missing");
        assert!(matches!(err, GenError::NotFound(_)));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ GeneratedTime: ").expect("write");
        assert!(matches!(
            ManifestStore::new(&path).load(),
            Err(GenError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_tolerates_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "ProtoPackageName": "gamepb" }"#).expect("write");
        let manifest = ManifestStore::new(&path).load().expect("partial manifest loads");
        assert_eq!(manifest.proto_package_name, "gamepb");
        assert_eq!(manifest.generated_time.timestamp(), 0);

        fs::write(&path, r#"{ "GeneratedTime": 1700000000 }"#).expect("write");
        let manifest = ManifestStore::new(&path).load().expect("partial manifest loads");
        assert_eq!(manifest.proto_package_name, "");
        assert_eq!(manifest.generated_time.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_load_tolerates_mistyped_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mistyped.json");
        fs::write(
            &path,
            r#"{ "GeneratedTime": "2023-11-14", "ProtoPackageName": "gamepb" }"#,
        )
        .expect("write");
        let manifest = ManifestStore::new(&path).load().expect("mistyped manifest loads");
        assert_eq!(manifest.proto_package_name, "gamepb");
        assert_eq!(manifest.generated_time.timestamp(), 0);

        fs::write(&path, r#"{ "GeneratedTime": 1700000000.5, "ProtoPackageName": 7 }"#)
            .expect("write");
        let manifest = ManifestStore::new(&path).load().expect("mistyped manifest loads");
        assert_eq!(manifest.proto_package_name, "");
        assert_eq!(manifest.generated_time.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ManifestStore::new(dir.path().join("missing").join("GeneratedManifest.json"));
        assert!(matches!(
            store.save(&GeneratedManifest::now("gamepb")),
            Err(GenError::DirMissing(_))
        ));
    }

    #[test]
    fn test_saved_json_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ManifestStore::new(dir.path().join("m.json"));
        store
            .save(&GeneratedManifest {
                generated_time: from_unix(1_700_000_000),
                proto_package_name: "gamepb".to_string(),
            })
            .expect("save");
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).expect("read")).expect("json");
        assert_eq!(value["GeneratedTime"].as_i64(), Some(1_700_000_000));
        assert_eq!(value["ProtoPackageName"], "gamepb");
    }

    #[test]
    fn test_staleness() {
        let manifest = GeneratedManifest::now("gamepb");
        assert!(!manifest.is_stale("gamepb", None));
        assert!(manifest.is_stale("otherpb", None));
        assert!(manifest.is_stale("gamepb", Some(manifest.generated_time + Duration::seconds(5))));
        assert!(!manifest.is_stale("gamepb", Some(manifest.generated_time - Duration::seconds(5))));
    }
}
