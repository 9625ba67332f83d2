//! Bucket command - show where a user lands for a feature.

use crate::GlobalArgs;
use crate::error::CliResult;
use clap::Args;
use rollgate_features::{Bucketer, hash};
use serde_json::json;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct BucketArgs {
    /// User id
    pub user: String,

    /// Feature name
    pub feature: String,
}

pub fn execute(global: &GlobalArgs, args: &BucketArgs) -> CliResult<ExitCode> {
    let bucketer = Bucketer::new(global.salt.as_str());
    let key = format!("{}:{}:{}", bucketer.salt(), args.feature, args.user);
    let bucket = bucketer.bucket(&args.user, &args.feature);

    if global.json {
        let output = json!({
            "user": args.user,
            "feature": args.feature,
            "salt": bucketer.salt(),
            "hash": hash(&key),
            "bucket": bucket,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("key:    {}", key);
        println!("hash:   {}", hash(&key));
        println!("bucket: {:.3}", bucket);
    }

    Ok(ExitCode::SUCCESS)
}
