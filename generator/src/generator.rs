//! Generation entry point: assemble, write, record.

use crate::actor::ActorDescriptor;
use crate::artifacts::remove_all_generated;
use crate::bundle::BundleAssembler;
use crate::error::{GenError, Result};
use crate::manifest::{GeneratedManifest, ManifestStore};
use replicator_reflection::{ModuleManifest, ReflectionProvider};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR_NAME: &str = "ChanneldGenerated";
pub const DEFAULT_MANIFEST_PATH: &str = "Intermediate/ReplicatorGenerator/GeneratedManifest.json";
pub const DEFAULT_SCHEMA_PACKAGE: &str = "channeldgenpb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Module the generated code belongs to; its last path component names
    /// the channel data files.
    pub module_dir: PathBuf,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Empty the output directory before writing. Only done once the
    /// bundle has been assembled, so a failed run leaves it untouched.
    pub clear_output: bool,
}

impl GeneratorConfig {
    pub fn new(module_dir: impl Into<PathBuf>) -> Self {
        let module_dir = module_dir.into();
        Self {
            output_dir: module_dir.join(DEFAULT_OUTPUT_DIR_NAME),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            clear_output: false,
            module_dir,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_manifest_path(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = manifest_path.into();
        self
    }

    pub fn with_clear_output(mut self, clear_output: bool) -> Self {
        self.clear_output = clear_output;
        self
    }
}

/// Destination of generated text.
pub trait ArtifactWriter {
    fn write(&mut self, path: &Path, contents: &str) -> std::io::Result<()>;
}

/// Writes to the local filesystem, creating parent directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl ArtifactWriter for FsWriter {
    fn write(&mut self, path: &Path, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub requested: usize,
    /// Generated identifiers, in run order.
    pub generated: Vec<String>,
    pub written: usize,
    /// Entries removed from the output directory before writing.
    pub cleared: usize,
    pub write_failures: Vec<WriteFailure>,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.write_failures.is_empty()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.write_failures.first().map(|f| f.message.as_str())
    }

    /// Requested classes that produced no replicator (ignored).
    pub fn skipped(&self) -> usize {
        self.requested.saturating_sub(self.generated.len())
    }
}

/// Generates replicators for a set of classes and records the run.
///
/// Constructed explicitly by the caller; `run` takes `&mut self`, so one
/// instance performs one run at a time.
pub struct Generator<'a, W: ArtifactWriter = FsWriter> {
    config: GeneratorConfig,
    provider: &'a dyn ReflectionProvider,
    modules: &'a ModuleManifest,
    writer: W,
}

impl<'a> Generator<'a, FsWriter> {
    pub fn new(
        config: GeneratorConfig,
        provider: &'a dyn ReflectionProvider,
        modules: &'a ModuleManifest,
    ) -> Self {
        Self::with_writer(config, provider, modules, FsWriter)
    }
}

impl<'a, W: ArtifactWriter> Generator<'a, W> {
    pub fn with_writer(
        config: GeneratorConfig,
        provider: &'a dyn ReflectionProvider,
        modules: &'a ModuleManifest,
        writer: W,
    ) -> Self {
        Self {
            config,
            provider,
            modules,
            writer,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn manifest_store(&self) -> ManifestStore {
        ManifestStore::new(&self.config.manifest_path)
    }

    fn assembler(&self) -> BundleAssembler<'a> {
        BundleAssembler::new(self.provider, self.modules)
    }

    /// Describe a class as it would be generated, without properties.
    pub fn preview(
        &self,
        target: &str,
        schema_package: &str,
        go_import_prefix: &str,
    ) -> Result<ActorDescriptor> {
        self.assembler().preview(
            target,
            schema_package,
            &go_package(go_import_prefix, schema_package),
        )
    }

    /// Assemble and write every artifact for `targets`, then save the
    /// manifest. Write failures are collected in the report; only assembly,
    /// output clearing and manifest failures are errors. Nothing on disk
    /// changes when assembly fails.
    pub fn run(
        &mut self,
        targets: &[String],
        schema_package: &str,
        go_import_prefix: &str,
    ) -> Result<GenerationReport> {
        let go_package = go_package(go_import_prefix, schema_package);
        let bundle = self.assembler().assemble(
            targets,
            &self.config.module_dir,
            schema_package,
            &go_package,
        )?;

        let cleared = if self.config.clear_output {
            remove_all_generated(&self.config.output_dir)?
        } else {
            0
        };

        let mut written = 0;
        let mut write_failures = Vec::new();
        for artifact in bundle.artifacts() {
            let path = self.config.output_dir.join(&artifact.file_name);
            match self.writer.write(&path, artifact.contents) {
                Ok(()) => written += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to write generated file");
                    write_failures.push(WriteFailure {
                        message: format!("failed to write {}: {}", path.display(), e),
                        path,
                    });
                }
            }
        }

        let store = self.manifest_store();
        if let Some(parent) = store.path().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GenError::WriteFailed {
                path: store.path().to_path_buf(),
                source,
            })?;
        }
        store.save(&GeneratedManifest::now(schema_package))?;

        let report = GenerationReport {
            requested: targets.len(),
            generated: bundle.actors().map(|a| a.id.clone()).collect(),
            written,
            cleared,
            write_failures,
            output_dir: self.config.output_dir.clone(),
            manifest_path: self.config.manifest_path.clone(),
        };

        tracing::info!(
            requested = report.requested,
            generated = report.generated.len(),
            written = report.written,
            failed = report.write_failures.len(),
            "generation finished"
        );
        Ok(report)
    }
}

/// Go import path of the generated protobuf package.
pub fn go_package(go_import_prefix: &str, schema_package: &str) -> String {
    format!("{}{}", go_import_prefix, schema_package)
}
