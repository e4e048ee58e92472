//! Assembly of every generated artifact for one run.

use crate::actor::ActorDescriptor;
use crate::error::{GenError, Result};
use crate::naming::{
    channel_data_header_file, channel_data_schema_file, GLOBAL_STRUCT_HEADER_FILE,
    GLOBAL_STRUCT_SCHEMA_FILE, REGISTRATION_HEADER_FILE, TYPE_DEFINITIONS_BODY_FILE,
    TYPE_DEFINITIONS_HEADER_FILE,
};
use crate::resolver::ModuleResolver;
use crate::run::{DescribeOptions, Run};
use crate::templates::channel_data::{self, ChannelDataNames, ProcessorFragments};
use crate::templates::shared::{self, RegistrationInput};
use crate::templates::{include_line, proto, replicator, RpcParamStructs};
use replicator_reflection::{ModuleManifest, ReflectionProvider};
use std::path::Path;

/// One file to write, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact<'a> {
    pub file_name: String,
    pub contents: &'a str,
}

/// Everything generated for one class.
#[derive(Debug)]
pub struct ReplicatorCode {
    pub actor: ActorDescriptor,
    pub header: String,
    pub body: String,
    pub schema: String,
    pub include_line: String,
    pub registration_line: String,
    /// Class path constant, blueprint classes only.
    pub class_path_declaration: Option<String>,
    pub channel_data: ProcessorFragments,
}

#[derive(Debug)]
pub struct CodeBundle {
    pub module_name: String,
    pub replicators: Vec<ReplicatorCode>,
    pub type_definitions_header: String,
    pub type_definitions_body: String,
    pub registration_header: String,
    pub global_struct_header: String,
    pub global_struct_schema: String,
    pub channel_data_header: String,
    pub channel_data_schema: String,
}

impl CodeBundle {
    /// Every file of the bundle: per-class files in run order, then the
    /// shared files.
    pub fn artifacts(&self) -> Vec<Artifact<'_>> {
        let mut artifacts = Vec::with_capacity(self.replicators.len() * 3 + 7);
        for code in &self.replicators {
            let names = &code.actor.names;
            artifacts.push(artifact(&names.header_file, &code.header));
            artifacts.push(artifact(&names.body_file, &code.body));
            artifacts.push(artifact(&names.schema_file, &code.schema));
        }
        artifacts.push(artifact(TYPE_DEFINITIONS_HEADER_FILE, &self.type_definitions_header));
        artifacts.push(artifact(TYPE_DEFINITIONS_BODY_FILE, &self.type_definitions_body));
        artifacts.push(artifact(REGISTRATION_HEADER_FILE, &self.registration_header));
        artifacts.push(artifact(GLOBAL_STRUCT_HEADER_FILE, &self.global_struct_header));
        artifacts.push(artifact(GLOBAL_STRUCT_SCHEMA_FILE, &self.global_struct_schema));
        artifacts.push(artifact(
            &channel_data_header_file(&self.module_name),
            &self.channel_data_header,
        ));
        artifacts.push(artifact(
            &channel_data_schema_file(&self.module_name),
            &self.channel_data_schema,
        ));
        artifacts
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorDescriptor> {
        self.replicators.iter().map(|r| &r.actor)
    }
}

fn artifact<'a>(file_name: &str, contents: &'a str) -> Artifact<'a> {
    Artifact {
        file_name: file_name.to_string(),
        contents,
    }
}

/// Builds [`CodeBundle`]s from class references.
pub struct BundleAssembler<'a> {
    provider: &'a dyn ReflectionProvider,
    modules: &'a ModuleManifest,
}

impl<'a> BundleAssembler<'a> {
    pub fn new(provider: &'a dyn ReflectionProvider, modules: &'a ModuleManifest) -> Self {
        Self { provider, modules }
    }

    fn new_run(&self) -> Run<'a> {
        Run::new(self.provider, ModuleResolver::primed(self.modules))
    }

    fn class(&self, target: &str) -> Result<&'a replicator_reflection::ClassDescriptor> {
        let provider = self.provider;
        provider
            .class(target)
            .ok_or_else(|| GenError::NotFound(format!("class {} is not in the reflection data", target)))
    }

    /// Describe one class without recording it anywhere or normalizing its
    /// properties.
    pub fn preview(&self, target: &str, schema_package: &str, go_package: &str) -> Result<ActorDescriptor> {
        let class = self.class(target)?;
        self.new_run()
            .describe(class, schema_package, go_package, DescribeOptions::preview())
    }

    /// Assemble the bundle for `targets`, in order. Ignored classes are
    /// skipped; any other failure aborts the whole assembly.
    pub fn assemble(
        &self,
        targets: &[String],
        module_dir: &Path,
        schema_package: &str,
        go_package: &str,
    ) -> Result<CodeBundle> {
        let module_name = module_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| GenError::Malformed {
                what: "module directory".to_string(),
                reason: format!("{} has no final path component", module_dir.display()),
            })?;

        let mut run = self.new_run();
        let mut actors = Vec::with_capacity(targets.len());
        for target in targets {
            let class = self.class(target)?;
            match run.describe(class, schema_package, go_package, DescribeOptions::default()) {
                Ok(actor) => actors.push(actor),
                Err(GenError::Ignored(path)) => {
                    tracing::debug!(class = %path, "class is ignored, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        let shared_structs = RpcParamStructs::collect(&actors);
        let channel_names = ChannelDataNames::for_module(&module_name);

        let fragments: Vec<ProcessorFragments> = actors
            .iter()
            .map(|actor| {
                let children = channel_data::owned_children(actor, &actors);
                ProcessorFragments {
                    merge: channel_data::merge_fragment(actor, &children),
                    get_state: channel_data::get_state_fragment(actor),
                    set_state: channel_data::set_state_fragment(actor, &children),
                }
            })
            .collect();

        let struct_types = shared::collect_struct_types(&actors);
        let channel_data_header_name = channel_data_header_file(&module_name);

        let type_definitions_header = shared::render_type_definitions_header(&actors, &shared_structs);
        let type_definitions_body = shared::render_type_definitions_body(&actors);
        let registration_header = shared::render_registration_header(&RegistrationInput {
            actors: &actors,
            channel_data_header: &channel_data_header_name,
            channel_data_message: &channel_names.message,
            processor_namespace: &channel_names.processor_namespace,
            schema_package,
        });
        let global_struct_header =
            shared::render_global_struct_header(&actors, &struct_types, schema_package);
        let global_struct_schema =
            shared::render_global_struct_schema(&struct_types, schema_package, go_package);
        let channel_data_header = channel_data::render_processor_header(
            &actors,
            &fragments,
            &channel_names,
            schema_package,
        );
        let channel_data_schema =
            channel_data::render_schema(&actors, &channel_names, schema_package, go_package);

        let replicators: Vec<ReplicatorCode> = actors
            .into_iter()
            .zip(fragments)
            .map(|(actor, channel_data)| ReplicatorCode {
                header: replicator::render_header(&actor, &shared_structs),
                body: replicator::render_body(&actor, &shared_structs),
                schema: proto::render_schema(&actor),
                include_line: include_line(&actor.names.header_file),
                registration_line: shared::registration_line(&actor),
                class_path_declaration: actor.blueprint.then(|| actor.class_path_declaration()),
                channel_data,
                actor,
            })
            .collect();

        tracing::info!(
            module = %module_name,
            requested = targets.len(),
            assembled = replicators.len(),
            shared_param_structs = shared_structs.len(),
            global_structs = struct_types.len(),
            "code bundle assembled"
        );

        Ok(CodeBundle {
            module_name,
            replicators,
            type_definitions_header,
            type_definitions_body,
            registration_header,
            global_struct_header,
            global_struct_schema,
            channel_data_header,
            channel_data_schema,
        })
    }
}
