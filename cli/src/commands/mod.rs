pub mod clean;
pub mod config;
pub mod generate;
pub mod inspect;
pub mod list;
pub mod remove;
pub mod status;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use replicator_reflection::parse::{parse_module_manifest_file, parse_snapshot_file};
use replicator_reflection::{ModuleManifest, ReflectionSnapshot};
use std::path::Path;

use crate::config::RepgenConfig;

/// Configuration plus the engine exports it points at.
pub struct Project {
    pub config: RepgenConfig,
    pub snapshot: ReflectionSnapshot,
    pub modules: ModuleManifest,
}

impl Project {
    pub fn open(config_path: &str) -> Result<Self> {
        let config = RepgenConfig::load(config_path).with_context(|| {
            format!(
                "Failed to load configuration. Run `repgen config init` to create {}.",
                config_path
            )
        })?;
        Self::from_config(config)
    }

    pub fn from_config(config: RepgenConfig) -> Result<Self> {
        let reflection = config.reflection_path();
        let snapshot = parse_snapshot_file(&reflection)
            .with_context(|| format!("Failed to load reflection data: {}", reflection.display()))?
            .with_ignore_list(config.ignore_list()?);

        let modules_path = config.modules_path();
        let modules = parse_module_manifest_file(&modules_path).with_context(|| {
            format!("Failed to load module manifest: {}", modules_path.display())
        })?;

        tracing::debug!(
            classes = snapshot.classes().len(),
            modules = modules.modules.len(),
            "project loaded"
        );

        Ok(Self {
            config,
            snapshot,
            modules,
        })
    }

    /// Class references to generate: explicit names first, then configured
    /// targets, then every class in the snapshot. Names are looked up by
    /// reference, C++ name or bare name; unknown names pass through so the
    /// generator reports them.
    pub fn targets(&self, requested: &[String]) -> Vec<String> {
        let names = if !requested.is_empty() {
            requested.to_vec()
        } else if !self.config.targets.classes.is_empty() {
            self.config.targets.classes.clone()
        } else {
            return self.snapshot.class_paths();
        };

        names
            .into_iter()
            .map(|name| match self.snapshot.find(&name) {
                Some(class) => class.path.clone(),
                None => name,
            })
            .collect()
    }

    /// Latest modification time among the configuration and its inputs, at
    /// the second precision the generated manifest records.
    pub fn inputs_modified(&self, config_path: &str) -> Option<DateTime<Utc>> {
        [
            Path::new(config_path).to_path_buf(),
            self.config.reflection_path(),
            self.config.modules_path(),
        ]
        .iter()
        .filter_map(|path| path.metadata().and_then(|m| m.modified()).ok())
        .map(DateTime::<Utc>::from)
        .max()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t.timestamp(), 0))
    }
}
