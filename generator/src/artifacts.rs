//! Maintenance of previously generated files, driven only by the naming
//! convention.

use crate::error::{GenError, Result};
use crate::naming::{generated_files_for, REPLICATOR_HEADER_PATTERN, SCHEMA_EXTENSION};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(GenError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| GenError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Identifiers of the replicators present in `dir`, sorted.
pub fn generated_class_names(dir: &Path) -> Result<Vec<String>> {
    let pattern = Regex::new(REPLICATOR_HEADER_PATTERN).map_err(|e| GenError::Malformed {
        what: "replicator header pattern".to_string(),
        reason: e.to_string(),
    })?;

    Ok(file_names(dir)?
        .iter()
        .filter_map(|name| pattern.captures(name))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect())
}

/// Schema files present in `dir`, sorted.
pub fn generated_schema_files(dir: &Path) -> Result<Vec<String>> {
    Ok(file_names(dir)?
        .into_iter()
        .filter(|name| name.ends_with(SCHEMA_EXTENSION))
        .collect())
}

/// Delete the five files generated for each identifier. Missing files are
/// skipped. Returns the paths actually deleted.
pub fn remove_generated<S: AsRef<str>>(dir: &Path, ids: &[S]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for id in ids {
        for file in generated_files_for(id.as_ref()) {
            let path = dir.join(file);
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(GenError::Io { path, source }),
            }
        }
    }
    tracing::debug!(dir = %dir.display(), removed = removed.len(), "generated files removed");
    Ok(removed)
}

/// Delete everything inside `dir`, keeping the directory itself.
pub fn remove_all_generated(dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(GenError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut count = 0;
    for entry in entries {
        let path = entry
            .map_err(|source| GenError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|source| GenError::Io {
            path: path.clone(),
            source,
        })?;
        count += 1;
    }
    tracing::debug!(dir = %dir.display(), removed = count, "output directory cleared");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").expect("touch");
    }

    #[test]
    fn test_enumerate_generated() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in [
            "ChanneldDoorReplicator.h",
            "ChanneldDoorReplicator.cpp",
            "Door.proto",
            "ChanneldBP_Door_C_1Replicator.h",
            "ChanneldReplicatorTypes.h",
            "ChannelData_Game.proto",
            "notes.txt",
        ] {
            touch(dir.path(), name);
        }

        assert_eq!(
            generated_class_names(dir.path()).expect("names"),
            vec!["BP_Door_C_1", "Door"]
        );
        assert_eq!(
            generated_schema_files(dir.path()).expect("schemas"),
            vec!["ChannelData_Game.proto", "Door.proto"]
        );
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("gone");
        assert!(generated_class_names(&missing).expect("names").is_empty());
        assert_eq!(remove_all_generated(&missing).expect("clean"), 0);
    }

    #[test]
    fn test_remove_generated_deletes_exactly_five_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in generated_files_for("Foo") {
            touch(dir.path(), &name);
        }
        touch(dir.path(), "ChanneldFoo_1Replicator.h");
        touch(dir.path(), "Bar.proto");

        let removed = remove_generated(dir.path(), &["Foo"]).expect("remove");
        assert_eq!(removed.len(), 5);
        assert!(dir.path().join("ChanneldFoo_1Replicator.h").exists());
        assert!(dir.path().join("Bar.proto").exists());
    }

    #[test]
    fn test_remove_generated_tolerates_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "Foo.proto");
        let removed = remove_generated(dir.path(), &["Foo"]).expect("remove");
        assert_eq!(removed, vec![dir.path().join("Foo.proto")]);
        assert!(remove_generated(dir.path(), &["Foo"]).expect("remove again").is_empty());
    }

    #[test]
    fn test_remove_all_generated() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "A.proto");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        touch(&dir.path().join("sub"), "B.proto");

        assert_eq!(remove_all_generated(dir.path()).expect("clean"), 2);
        assert!(dir.path().exists());
        assert_eq!(fs::read_dir(dir.path()).expect("read").count(), 0);
    }
}
