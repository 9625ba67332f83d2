//! Validate command - load the configuration and report problems.

use super::load_table;
use crate::GlobalArgs;
use crate::error::CliResult;
use colored::Colorize;
use serde_json::json;
use std::process::ExitCode;

pub fn execute(global: &GlobalArgs) -> CliResult<ExitCode> {
    let (table, report) = load_table(global)?;

    if global.json {
        let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
        let output = json!({
            "entries": table.len(),
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Loaded {} feature entries", table.len());
    if report.is_clean() {
        println!("{} configuration is valid", "✓".green());
    } else {
        for issue in &report.warnings {
            println!("{} {}", "⚠".yellow(), issue);
        }
        println!("{} warning(s)", report.warnings.len());
    }

    Ok(ExitCode::SUCCESS)
}
