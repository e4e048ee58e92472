use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::RepgenConfig;
use crate::ui;

pub fn init(config_path: &str, module_dir: &str) -> Result<()> {
    let path = Path::new(config_path);

    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse a different path or remove the existing file.",
            path.display()
        );
    }

    let config = RepgenConfig::template(module_dir);
    config.validate()?;

    let config_toml = toml::to_string_pretty(&config)?;
    fs::write(path, &config_toml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    ui::print_success(&format!("Created {}", path.display()));
    println!();
    println!("{}", "Next steps:".bold());
    println!(
        "  1. Export reflection data to {} and the module manifest to {}",
        config.inputs.reflection.cyan(),
        config.inputs.modules.cyan()
    );
    println!("  2. Check the configuration: {}", "repgen config validate".cyan());
    println!("  3. Generate replicators: {}", "repgen generate".cyan());

    Ok(())
}

pub fn validate(config_path: &str) -> Result<()> {
    ui::print_step("Validating configuration...");

    let config = RepgenConfig::load(config_path).context(
        "Failed to load configuration. Run `repgen config init` to create a configuration file.",
    )?;
    config.ignore_list()?;

    ui::print_success("Configuration is valid!");
    println!();
    ui::print_field("Module", &config.module_dir().display().to_string());
    ui::print_field("Output", &config.output_dir().display().to_string());
    ui::print_field("Manifest", &config.manifest_path().display().to_string());
    ui::print_field("Proto package", &config.proto.package.bold().to_string());
    if !config.proto.go_import_prefix.is_empty() {
        ui::print_field("Go import prefix", &config.proto.go_import_prefix);
    }

    for (label, path) in [
        ("Reflection data", config.reflection_path()),
        ("Module manifest", config.modules_path()),
    ] {
        if path.is_file() {
            ui::print_field(label, &path.display().to_string());
        } else {
            ui::print_field(
                label,
                &format!("{} {}", path.display(), "(missing)".yellow()),
            );
        }
    }

    println!();
    if config.targets.classes.is_empty() {
        ui::print_info("No targets listed; every reflected class will be generated.");
    } else {
        println!("  {} Targets ({}):", ui::symbols::BULLET.dimmed(), config.targets.classes.len());
        for target in &config.targets.classes {
            ui::print_item(target);
        }
    }

    let ignored = config.ignore.classes.len() + config.ignore.paths.len();
    if ignored > 0 {
        ui::print_info(&format!("{} ignore rule(s)", ignored));
    }

    Ok(())
}
