use anyhow::Result;
use colored::Colorize;
use replicator_generator::artifacts::generated_class_names;
use replicator_generator::ManifestStore;
use serde::Serialize;

use super::Project;
use crate::config::RepgenConfig;
use crate::ui;

#[derive(Serialize)]
struct StatusOutput {
    module_dir: String,
    output_dir: String,
    manifest_path: String,
    package: String,
    generated_time: Option<String>,
    manifest_package: Option<String>,
    replicators: usize,
    stale: bool,
}

/// Summarize the last generation run and whether it is out of date.
pub fn status(config_path: &str, json: bool) -> Result<()> {
    let Some(config) = RepgenConfig::load_optional(config_path)? else {
        if json {
            println!("{}", serde_json::json!({ "configured": false }));
        } else {
            ui::print_warning(&format!("No configuration at {}", config_path));
            ui::print_info("Run `repgen config init` to create one.");
        }
        return Ok(());
    };
    let project = Project::from_config(config)?;
    let config = &project.config;

    let store = ManifestStore::new(config.manifest_path());
    let manifest = if store.exists() {
        match store.load() {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                tracing::warn!(error = %e, "generated manifest could not be read");
                None
            }
        }
    } else {
        None
    };

    let replicators = generated_class_names(&config.output_dir())?.len();
    let stale = match &manifest {
        Some(m) => {
            replicators == 0
                || m.is_stale(&config.proto.package, project.inputs_modified(config_path))
        }
        None => true,
    };

    let output = StatusOutput {
        module_dir: config.module_dir().display().to_string(),
        output_dir: config.output_dir().display().to_string(),
        manifest_path: store.path().display().to_string(),
        package: config.proto.package.clone(),
        generated_time: manifest.as_ref().map(|m| m.generated_time.to_rfc3339()),
        manifest_package: manifest.as_ref().map(|m| m.proto_package_name.clone()),
        replicators,
        stale,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::print_section("Replicator generator");
    ui::print_field("Module", &output.module_dir);
    ui::print_field("Output", &output.output_dir);
    ui::print_field("Proto package", &output.package);
    ui::print_field("Replicators", &output.replicators.to_string());

    match &manifest {
        Some(m) => {
            ui::print_field(
                "Last generated",
                &format!(
                    "{} ({})",
                    ui::format_relative_time(m.generated_time),
                    m.generated_time.format("%Y-%m-%d %H:%M:%S UTC")
                ),
            );
            if m.proto_package_name != config.proto.package {
                ui::print_field("Generated package", &m.proto_package_name.yellow().to_string());
            }
        }
        None => ui::print_field("Last generated", &"never".dimmed().to_string()),
    }

    println!();
    if stale {
        ui::print_warning("Generated code is out of date. Run `repgen generate`.");
    } else {
        ui::print_success("Generated code is up to date");
    }
    Ok(())
}
