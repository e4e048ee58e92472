use anyhow::{Context, Result};
use colored::Colorize;
use replicator_generator::artifacts::generated_class_names;
use replicator_generator::{GenError, GenerationReport, Generator};
use serde::Serialize;

use super::Project;
use crate::config::validate_package;
use crate::ui;

pub struct GenerateOptions {
    pub classes: Vec<String>,
    pub package: Option<String>,
    pub go_import_prefix: Option<String>,
    pub force: bool,
    pub keep_existing: bool,
    pub dry_run: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct PreviewEntry {
    target: String,
    id: Option<String>,
    header: Option<String>,
    skipped: Option<String>,
}

pub fn generate(config_path: &str, options: GenerateOptions) -> Result<()> {
    let project = Project::open(config_path)?;
    let config = &project.config;

    let package = options
        .package
        .clone()
        .unwrap_or_else(|| config.proto.package.clone());
    validate_package(&package)?;
    let go_import_prefix = options
        .go_import_prefix
        .clone()
        .unwrap_or_else(|| config.proto.go_import_prefix.clone());

    let targets = project.targets(&options.classes);
    let mut generator = Generator::new(
        config
            .generator_config()
            .with_clear_output(!options.keep_existing),
        &project.snapshot,
        &project.modules,
    );

    if options.dry_run {
        return preview(&generator, &targets, &package, &go_import_prefix, options.json);
    }

    let go_prefix_overridden = options
        .go_import_prefix
        .as_ref()
        .is_some_and(|prefix| *prefix != config.proto.go_import_prefix);
    let may_skip = !options.force && options.classes.is_empty() && !go_prefix_overridden;
    if may_skip && is_up_to_date(&project, &generator, config_path, &targets, &package)? {
        if options.json {
            println!("{}", serde_json::json!({ "up_to_date": true }));
        } else {
            ui::print_success("Generated code is up to date (use --force to regenerate)");
        }
        return Ok(());
    }

    let output_dir = config.output_dir();
    if !options.json {
        ui::print_step(&format!(
            "Generating replicators for {} class(es) into {}",
            targets.len(),
            output_dir.display()
        ));
    }

    let report = generator
        .run(&targets, &package, &go_import_prefix)
        .context("Generation failed")?;
    if report.cleared > 0 {
        tracing::info!(removed = report.cleared, dir = %output_dir.display(), "previous output cleared");
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(first) = report.first_error() {
        anyhow::bail!(
            "{} of {} file(s) could not be written: {}",
            report.write_failures.len(),
            report.written + report.write_failures.len(),
            first
        );
    }
    Ok(())
}

/// The last run covers `targets` with the current inputs and package, and
/// every target's replicator is still on disk.
fn is_up_to_date(
    project: &Project,
    generator: &Generator,
    config_path: &str,
    targets: &[String],
    package: &str,
) -> Result<bool> {
    let store = generator.manifest_store();
    if !store.exists() {
        return Ok(false);
    }
    let manifest = match store.load() {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable generated manifest");
            return Ok(false);
        }
    };
    if manifest.is_stale(package, project.inputs_modified(config_path)) {
        return Ok(false);
    }

    let on_disk = generated_class_names(&project.config.output_dir())?;
    if on_disk.is_empty() {
        return Ok(false);
    }
    let go_import_prefix = &project.config.proto.go_import_prefix;
    for target in targets {
        match generator.preview(target, package, go_import_prefix) {
            Ok(actor) if on_disk.contains(&actor.id) => {}
            Err(GenError::Ignored(_)) => {}
            Ok(actor) => {
                tracing::debug!(id = %actor.id, "replicator missing from output");
                return Ok(false);
            }
            Err(_) => return Ok(false),
        }
    }
    Ok(true)
}

fn preview(
    generator: &Generator,
    targets: &[String],
    package: &str,
    go_import_prefix: &str,
    json: bool,
) -> Result<()> {
    let mut entries = Vec::with_capacity(targets.len());
    for target in targets {
        let entry = match generator.preview(target, package, go_import_prefix) {
            Ok(actor) => PreviewEntry {
                target: target.clone(),
                id: Some(actor.id),
                header: Some(actor.header.include_path),
                skipped: None,
            },
            Err(e @ GenError::Ignored(_)) => PreviewEntry {
                target: target.clone(),
                id: None,
                header: None,
                skipped: Some(e.to_string()),
            },
            Err(e) => return Err(e).with_context(|| format!("Cannot generate {}", target)),
        };
        entries.push(entry);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    ui::print_section(&format!("Would generate ({} target(s))", entries.len()));
    for entry in &entries {
        match (&entry.id, &entry.header) {
            (Some(id), Some(header)) => ui::print_item(&format!(
                "{} {} ({})",
                id.bold(),
                entry.target.dimmed(),
                header
            )),
            _ => ui::print_item(&format!(
                "{} {}",
                entry.target.dimmed(),
                "ignored".yellow()
            )),
        }
    }
    println!();
    ui::print_info("Identifiers of repeated base names are assigned during generation.");
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for failure in &report.write_failures {
        ui::print_error(&failure.message);
    }

    if report.is_success() {
        ui::print_success(&format!(
            "Generated {} replicator(s), {} file(s) written",
            report.generated.len(),
            report.written
        ));
    } else {
        ui::print_warning(&format!(
            "Generated {} replicator(s), {} file(s) written, {} failed",
            report.generated.len(),
            report.written,
            report.write_failures.len()
        ));
    }

    if report.skipped() > 0 {
        ui::print_info(&format!("{} class(es) skipped by the ignore list", report.skipped()));
    }
    ui::print_info(&format!("Output: {}", report.output_dir.display()));
    ui::print_info(&format!("Manifest: {}", report.manifest_path.display()));
}
