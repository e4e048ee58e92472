//! Replicator code generation for ChanneldUE
//!
//! Turns reflected actor classes into replicator C++ sources, protobuf
//! schemas and the channel data layer that aggregates their states:
//!
//! - [`resolver`] finds the header declaring each class
//! - [`run`] assigns collision-free identifiers and builds
//!   [`ActorDescriptor`]s
//! - [`bundle`] renders every artifact of a run into a [`CodeBundle`]
//! - [`generator`] writes the bundle and records a [`GeneratedManifest`]
//! - [`artifacts`] enumerates and removes previously generated files

pub mod actor;
pub mod artifacts;
pub mod bundle;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod naming;
pub mod property;
pub mod resolver;
pub mod run;
pub mod templates;

pub use actor::ActorDescriptor;
pub use bundle::{Artifact, BundleAssembler, CodeBundle, ReplicatorCode};
pub use error::{GenError, Result};
pub use generator::{
    go_package, ArtifactWriter, FsWriter, GenerationReport, Generator, GeneratorConfig,
    WriteFailure, DEFAULT_SCHEMA_PACKAGE,
};
pub use manifest::{GeneratedManifest, ManifestStore};
pub use naming::{ArtifactNames, NameDeduplicator};
pub use resolver::{HeaderLocation, ModuleResolver};
pub use run::{DescribeOptions, Run};
