//! Dump command - print the resolved configuration.

use super::load_engine;
use crate::GlobalArgs;
use crate::error::CliResult;
use colored::Colorize;
use std::process::ExitCode;

pub fn execute(global: &GlobalArgs) -> CliResult<ExitCode> {
    let engine = load_engine(global)?;
    let environment = global.environment();
    let resolved = engine.resolved_config(environment);

    if global.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Environment:".bold(), environment);
    if resolved.is_empty() {
        println!("  (no features configured)");
    }
    for (feature, config) in &resolved {
        let state = if config.enabled {
            "on".green()
        } else {
            "off".red()
        };
        println!(
            "  {} {} rollout={}% whitelist={} blacklist={}",
            feature.bold(),
            state,
            config.rollout_percentage,
            config.whitelist.len(),
            config.blacklist.len()
        );
    }

    Ok(ExitCode::SUCCESS)
}
