use anyhow::{Context, Result};
use colored::Colorize;
use replicator_generator::{go_package, ActorDescriptor, DescribeOptions, ModuleResolver, Run};
use serde::Serialize;

use super::Project;
use crate::ui;

#[derive(Serialize)]
struct PropertyRow {
    source_name: String,
    field: String,
    number: u32,
    ty: String,
    custom_merge: bool,
}

#[derive(Serialize)]
struct RpcRow {
    name: String,
    kind: String,
    reliable: bool,
    message: String,
    params: Vec<String>,
}

#[derive(Serialize)]
struct InspectOutput {
    id: String,
    class_path: String,
    cpp_type: String,
    kind: String,
    blueprint: bool,
    header: String,
    state_message: String,
    channel_data_field: String,
    removed_flag: bool,
    components: Vec<String>,
    properties: Vec<PropertyRow>,
    rpcs: Vec<RpcRow>,
}

impl From<&ActorDescriptor> for InspectOutput {
    fn from(actor: &ActorDescriptor) -> Self {
        Self {
            id: actor.id.clone(),
            class_path: actor.class_path.clone(),
            cpp_type: actor.target_cpp_type.clone(),
            kind: format!("{:?}", actor.kind).to_lowercase(),
            blueprint: actor.blueprint,
            header: actor.header.include_path.clone(),
            state_message: actor.names.state_message.clone(),
            channel_data_field: actor.channel_data_field(),
            removed_flag: actor.has_removed_flag(),
            components: actor.components.clone(),
            properties: actor
                .properties
                .iter()
                .map(|p| PropertyRow {
                    source_name: p.source_name.clone(),
                    field: p.field.clone(),
                    number: p.number,
                    ty: p.ty.type_key(),
                    custom_merge: p.requires_custom_merge,
                })
                .collect(),
            rpcs: actor
                .rpcs
                .iter()
                .map(|r| RpcRow {
                    name: r.name.clone(),
                    kind: format!("{:?}", r.kind).to_lowercase(),
                    reliable: r.reliable,
                    message: r.message.clone(),
                    params: r
                        .params
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.ty.type_key()))
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Show how one class would be described for generation.
pub fn inspect(config_path: &str, class: &str, json: bool) -> Result<()> {
    let project = Project::open(config_path)?;
    let config = &project.config;

    let descriptor = project
        .snapshot
        .find(class)
        .with_context(|| format!("Class {} is not in the reflection data", class))?;

    let mut run = Run::new(&project.snapshot, ModuleResolver::primed(&project.modules));
    let actor = run
        .describe(
            descriptor,
            &config.proto.package,
            &go_package(&config.proto.go_import_prefix, &config.proto.package),
            DescribeOptions::default(),
        )
        .with_context(|| format!("Cannot describe {}", class))?;
    let output = InspectOutput::from(&actor);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::print_section(&format!("{} ({})", output.id.bold(), output.cpp_type));
    ui::print_field("Class path", &output.class_path);
    ui::print_field("Kind", &output.kind);
    ui::print_field("Header", &output.header);
    ui::print_field("State message", &output.state_message);
    ui::print_field("Channel data", &output.channel_data_field);
    if output.removed_flag {
        ui::print_field("Removed flag", "field 1");
    }
    if output.blueprint {
        ui::print_field("Blueprint", "yes");
    }
    for component in &output.components {
        ui::print_field("Component", component);
    }

    ui::print_section(&format!("Properties ({})", output.properties.len()));
    for p in &output.properties {
        let merge = if p.custom_merge { " custom merge" } else { "" };
        ui::print_item(&format!(
            "{:>3} {} {} {}{}",
            p.number,
            p.field.bold(),
            p.ty.dimmed(),
            p.source_name.dimmed(),
            merge.yellow()
        ));
    }

    ui::print_section(&format!("RPCs ({})", output.rpcs.len()));
    for r in &output.rpcs {
        let reliability = if r.reliable { "reliable" } else { "unreliable" };
        ui::print_item(&format!(
            "{} [{} {}] {}",
            r.name.bold(),
            r.kind,
            reliability,
            r.message.dimmed()
        ));
        for param in &r.params {
            ui::print_info(param);
        }
    }
    Ok(())
}
