use anyhow::Result;
use colored::Colorize;
use replicator_generator::artifacts::{generated_class_names, generated_schema_files};
use replicator_reflection::ReflectionProvider;
use serde::Serialize;

use super::Project;
use crate::ui;

#[derive(Serialize)]
struct GeneratedListing {
    replicators: Vec<String>,
    schemas: Vec<String>,
}

#[derive(Serialize)]
struct ClassListing {
    path: String,
    cpp_name: String,
    kind: String,
    ignored: bool,
}

/// List replicators present in the output directory, or with `available`
/// the classes in the reflection snapshot.
pub fn list(config_path: &str, available: bool, json: bool) -> Result<()> {
    let project = Project::open(config_path)?;

    if available {
        return list_classes(&project, json);
    }

    let output_dir = project.config.output_dir();
    let listing = GeneratedListing {
        replicators: generated_class_names(&output_dir)?,
        schemas: generated_schema_files(&output_dir)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.replicators.is_empty() {
        ui::print_warning(&format!("No replicators in {}", output_dir.display()));
        ui::print_info("Run `repgen generate` to create them.");
        return Ok(());
    }

    ui::print_section(&format!(
        "Generated replicators ({})",
        listing.replicators.len()
    ));
    for id in &listing.replicators {
        ui::print_item(&id.bold().to_string());
    }
    ui::print_info(&format!(
        "{} schema file(s) in {}",
        listing.schemas.len(),
        output_dir.display()
    ));
    Ok(())
}

fn list_classes(project: &Project, json: bool) -> Result<()> {
    let classes: Vec<ClassListing> = project
        .snapshot
        .classes()
        .iter()
        .map(|class| ClassListing {
            path: class.path.clone(),
            cpp_name: class.cpp_name(),
            kind: format!("{:?}", class.kind).to_lowercase(),
            ignored: project.snapshot.is_ignored(class),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&classes)?);
        return Ok(());
    }

    ui::print_section(&format!("Reflected classes ({})", classes.len()));
    for class in &classes {
        let line = format!("{} {} [{}]", class.cpp_name.bold(), class.path.dimmed(), class.kind);
        if class.ignored {
            ui::print_item(&format!("{} {}", line, "ignored".yellow()));
        } else {
            ui::print_item(&line);
        }
    }
    Ok(())
}
