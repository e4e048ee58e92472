use anyhow::{Context, Result};
use replicator_generator::generator::{DEFAULT_MANIFEST_PATH, DEFAULT_OUTPUT_DIR_NAME};
use replicator_generator::{GeneratorConfig, DEFAULT_SCHEMA_PACKAGE};
use replicator_reflection::utils::is_identifier;
use replicator_reflection::IgnoreList;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "repgen.toml";

/// Main configuration structure for repgen.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepgenConfig {
    pub project: ProjectConfig,

    pub inputs: InputsConfig,

    #[serde(default)]
    pub proto: ProtoConfig,

    #[serde(default)]
    pub targets: TargetsConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Game module the generated code is compiled into.
    pub module_dir: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
}

/// Engine exports the generator reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub reflection: String,
    pub modules: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtoConfig {
    #[serde(default = "default_package")]
    pub package: String,

    #[serde(default)]
    pub go_import_prefix: String,
}

impl Default for ProtoConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            go_import_prefix: String::new(),
        }
    }
}

fn default_package() -> String {
    DEFAULT_SCHEMA_PACKAGE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Class references to generate. Empty means every class in the snapshot.
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub classes: Vec<String>,

    /// Class path patterns, `*` matching any run of characters.
    #[serde(default)]
    pub paths: Vec<String>,
}

impl RepgenConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: RepgenConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.validate()?;
        Ok(config)
    }

    /// Try to load config, returning None if file doesn't exist
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Starter configuration written by `repgen config init`.
    pub fn template(module_dir: &str) -> Self {
        Self {
            project: ProjectConfig {
                module_dir: module_dir.to_string(),
                output_dir: None,
                manifest_path: None,
            },
            inputs: InputsConfig {
                reflection: "reflection.json".to_string(),
                modules: "modules.json".to_string(),
            },
            proto: ProtoConfig::default(),
            targets: TargetsConfig::default(),
            ignore: IgnoreConfig::default(),
            base_dir: PathBuf::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.module_dir.trim().is_empty() {
            anyhow::bail!("project.module_dir cannot be empty");
        }
        if self.inputs.reflection.trim().is_empty() || self.inputs.modules.trim().is_empty() {
            anyhow::bail!("inputs.reflection and inputs.modules must both be set");
        }
        validate_package(&self.proto.package)?;

        let mut seen = HashSet::new();
        for target in &self.targets.classes {
            if !seen.insert(target.as_str()) {
                anyhow::bail!("Duplicate target class: {}", target);
            }
        }

        Ok(())
    }

    /// Resolve a configured path against the config file's directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn module_dir(&self) -> PathBuf {
        self.resolve(&self.project.module_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        match &self.project.output_dir {
            Some(dir) => self.resolve(dir),
            None => self.module_dir().join(DEFAULT_OUTPUT_DIR_NAME),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(
            self.project
                .manifest_path
                .as_deref()
                .unwrap_or(DEFAULT_MANIFEST_PATH),
        )
    }

    pub fn reflection_path(&self) -> PathBuf {
        self.resolve(&self.inputs.reflection)
    }

    pub fn modules_path(&self) -> PathBuf {
        self.resolve(&self.inputs.modules)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.module_dir())
            .with_output_dir(self.output_dir())
            .with_manifest_path(self.manifest_path())
    }

    pub fn ignore_list(&self) -> Result<IgnoreList> {
        let mut ignore = self
            .ignore
            .classes
            .iter()
            .fold(IgnoreList::new(), |list, class| list.with_class(class));
        for pattern in &self.ignore.paths {
            ignore = ignore
                .with_path_pattern(pattern)
                .with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        }
        Ok(ignore)
    }
}

/// Proto package names are dot-separated identifiers.
pub fn validate_package(package: &str) -> Result<()> {
    if package.is_empty() {
        anyhow::bail!("proto.package cannot be empty");
    }
    if !package.split('.').all(is_identifier) {
        anyhow::bail!("proto.package is not a legal protobuf package name: {}", package);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, contents).expect("write config");
        (dir, path)
    }

    const MINIMAL: &str = r#"
[project]
module_dir = "Source/Game"

[inputs]
reflection = "reflection.json"
modules = "modules.json"
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let (dir, path) = write_config(MINIMAL);
        let config = RepgenConfig::load(&path).expect("config should load");

        assert_eq!(config.proto.package, DEFAULT_SCHEMA_PACKAGE);
        assert!(config.targets.classes.is_empty());
        assert_eq!(config.module_dir(), dir.path().join("Source/Game"));
        assert_eq!(
            config.output_dir(),
            dir.path().join("Source/Game").join(DEFAULT_OUTPUT_DIR_NAME)
        );
        assert_eq!(config.manifest_path(), dir.path().join(DEFAULT_MANIFEST_PATH));
        assert_eq!(config.reflection_path(), dir.path().join("reflection.json"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let (_dir, path) = write_config(
            r#"
[project]
module_dir = "/proj/Source/Game"
output_dir = "/out"

[inputs]
reflection = "r.json"
modules = "m.json"
"#,
        );
        let config = RepgenConfig::load(&path).expect("config should load");
        assert_eq!(config.module_dir(), PathBuf::from("/proj/Source/Game"));
        assert_eq!(config.output_dir(), PathBuf::from("/out"));
    }

    #[test]
    fn test_rejects_empty_package() {
        let (_dir, path) = write_config(&format!("{}\n[proto]\npackage = \"\"\n", MINIMAL));
        let err = RepgenConfig::load(&path).expect_err("empty package should fail");
        assert!(err.to_string().contains("proto.package"));
    }

    #[test]
    fn test_rejects_illegal_package() {
        let (_dir, path) =
            write_config(&format!("{}\n[proto]\npackage = \"my-game.pb\"\n", MINIMAL));
        assert!(RepgenConfig::load(&path).is_err());
        assert!(validate_package("game.v1pb").is_ok());
    }

    #[test]
    fn test_rejects_duplicate_targets() {
        let (_dir, path) = write_config(&format!(
            "{}\n[targets]\nclasses = [\"/Script/Game.Door\", \"/Script/Game.Door\"]\n",
            MINIMAL
        ));
        let err = RepgenConfig::load(&path).expect_err("duplicates should fail");
        assert!(err.to_string().contains("/Script/Game.Door"));
    }

    #[test]
    fn test_load_optional_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = RepgenConfig::load_optional(dir.path().join("nope.toml")).expect("ok");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_ignore_list() {
        let (_dir, path) = write_config(&format!(
            "{}\n[ignore]\nclasses = [\"/Script/Game.Debug\"]\npaths = [\"/Game/Test/*\"]\n",
            MINIMAL
        ));
        let config = RepgenConfig::load(&path).expect("config should load");
        assert!(!config.ignore_list().expect("ignore list").is_empty());
    }

    #[test]
    fn test_template_serializes() {
        let text = toml::to_string_pretty(&RepgenConfig::template("Source/Game")).expect("toml");
        assert!(text.contains("module_dir = \"Source/Game\""));
        assert!(text.contains("package = \"channeldgenpb\""));
    }
}
