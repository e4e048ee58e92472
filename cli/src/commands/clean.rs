use anyhow::{Context, Result};
use replicator_generator::artifacts::remove_all_generated;

use crate::config::RepgenConfig;
use crate::ui;

/// Empty the output directory, keeping the directory itself.
pub fn clean(config_path: &str, json: bool) -> Result<()> {
    let config = RepgenConfig::load(config_path)?;
    let output_dir = config.output_dir();

    let removed = remove_all_generated(&output_dir)
        .with_context(|| format!("Failed to clean {}", output_dir.display()))?;

    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else if removed == 0 {
        ui::print_info(&format!("{} is already empty", output_dir.display()));
    } else {
        ui::print_success(&format!(
            "Removed {} entr{} from {}",
            removed,
            if removed == 1 { "y" } else { "ies" },
            output_dir.display()
        ));
    }
    Ok(())
}
