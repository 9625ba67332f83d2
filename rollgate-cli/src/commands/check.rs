//! Check command - evaluate one feature.

use super::{ContextArgs, load_engine};
use crate::GlobalArgs;
use crate::error::{CliError, CliResult};
use clap::Args;
use colored::Colorize;
use rollgate_features::FeatureCheckResult;
use serde_json::json;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Feature name
    pub feature: String,

    #[command(flatten)]
    pub context: ContextArgs,
}

pub fn execute(global: &GlobalArgs, args: &CheckArgs) -> CliResult<ExitCode> {
    if args.feature.trim().is_empty() {
        return Err(CliError::InvalidArgument("feature name cannot be empty".to_string()));
    }

    let engine = load_engine(global)?;
    let context = args.context.context(global);
    let result = engine.is_feature_enabled(&args.feature, &context);

    if global.json {
        let output = json!({
            "feature": args.feature,
            "environment": global.environment(),
            "enabled": result.enabled,
            "reason": result.reason,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", args.feature.bold(), describe(&result));
    }

    Ok(if result.enabled {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// One-word status followed by the reason code.
pub fn describe(result: &FeatureCheckResult) -> String {
    let status = if result.enabled {
        "enabled".green().to_string()
    } else {
        "disabled".red().to_string()
    };
    format!("{} ({})", status, result.reason)
}
