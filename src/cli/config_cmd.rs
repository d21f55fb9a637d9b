use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{self, OutputFormat, OutputOptions};
use crate::core::config::AppConfig;

#[derive(Serialize)]
struct CheckPayload {
    config: String,
    valid: bool,
    default_format: String,
    color: String,
    workload: String,
    workload_exists: bool,
    issues: Vec<String>,
}

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!(
                "  Workload file: {}",
                AppConfig::default().workload_path().display()
            );
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check(opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `lakecost config init` to create one.");
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    let workload = config.workload_path();

    if opts.format == OutputFormat::Json {
        let payload = CheckPayload {
            config: path.display().to_string(),
            valid: issues.is_empty(),
            default_format: config.settings.default_format.clone(),
            color: config.settings.color.clone(),
            workload_exists: workload.exists(),
            workload: workload.display().to_string(),
            issues,
        };
        output::print_json(&payload, opts.pretty)?;
        if !payload.valid {
            std::process::exit(1);
        }
        return Ok(());
    }

    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        println!("  Output format: {}", config.settings.default_format);
        println!("  Color: {}", config.settings.color);
        let state = if workload.exists() { "" } else { " (missing)" };
        println!("  Workload file: {}{}", workload.display(), state);
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}
