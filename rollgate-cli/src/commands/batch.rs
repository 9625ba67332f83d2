//! Batch command - evaluate several features for one user.

use super::{ContextArgs, check::describe, load_engine};
use crate::GlobalArgs;
use crate::error::CliResult;
use clap::Args;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Feature names
    #[arg(required = true)]
    pub features: Vec<String>,

    #[command(flatten)]
    pub context: ContextArgs,
}

pub fn execute(global: &GlobalArgs, args: &BatchArgs) -> CliResult<ExitCode> {
    let engine = load_engine(global)?;
    let context = args.context.context(global);
    let results = engine.evaluate_all(&args.features, &context);

    if global.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let width = results.keys().map(String::len).max().unwrap_or(0);
        for (feature, result) in &results {
            println!("{:width$}  {}", feature, describe(result), width = width);
        }
    }

    Ok(ExitCode::SUCCESS)
}
