use anyhow::{Context, Result};
use replicator_generator::artifacts::remove_generated;
use serde::Serialize;

use crate::config::RepgenConfig;
use crate::ui;

#[derive(Serialize)]
struct RemoveOutput {
    removed: Vec<String>,
}

/// Delete the generated files of the given replicator identifiers.
pub fn remove(config_path: &str, ids: &[String], json: bool) -> Result<()> {
    let config = RepgenConfig::load(config_path)?;
    let output_dir = config.output_dir();

    let removed = remove_generated(&output_dir, ids)
        .with_context(|| format!("Failed to remove files from {}", output_dir.display()))?;
    let removed: Vec<String> = removed.iter().map(|p| p.display().to_string()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&RemoveOutput { removed })?);
        return Ok(());
    }

    if removed.is_empty() {
        ui::print_warning("No generated files matched");
        return Ok(());
    }
    for path in &removed {
        ui::print_removed(path);
    }
    ui::print_success(&format!(
        "Removed {} file(s) for {} replicator(s)",
        removed.len(),
        ids.len()
    ));
    ui::print_info("Regenerate to refresh the registration and channel data files.");
    Ok(())
}
