//! CLI command implementations.

pub mod batch;
pub mod bucket;
pub mod check;
pub mod dump;
pub mod validate;

use crate::GlobalArgs;
use crate::error::CliResult;
use clap::Args;
use rollgate_config::{FeatureConfigBuilder, ValidationReport};
use rollgate_features::{FeatureCheckContext, FeatureTable, RolloutEngine};
use tracing::debug;

/// Caller identity options
#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// User id to evaluate for
    #[arg(short, long)]
    pub user: Option<String>,

    /// Let callers without a user id through
    #[arg(long)]
    pub allow_anonymous: bool,
}

impl ContextArgs {
    pub fn context(&self, global: &GlobalArgs) -> FeatureCheckContext {
        let mut context = FeatureCheckContext::new()
            .with_environment(global.environment())
            .with_allow_anonymous(self.allow_anonymous);
        context.user_id = self.user.clone();
        context
    }
}

/// Load the layered feature table described by the global options.
pub fn load_table(global: &GlobalArgs) -> CliResult<(FeatureTable, ValidationReport)> {
    let mut builder = FeatureConfigBuilder::new().with_prefix(global.prefix.as_str());
    for path in &global.configs {
        builder = builder.add_file(path);
    }
    if !global.no_env {
        builder = builder.load_env();
    }
    debug!(
        files = global.configs.len(),
        prefix = %global.prefix,
        env = !global.no_env,
        "Loading feature table"
    );
    Ok(builder.build_with_report()?)
}

/// Build an engine over the loaded table.
pub fn load_engine(global: &GlobalArgs) -> CliResult<RolloutEngine<FeatureTable>> {
    let (table, _) = load_table(global)?;
    debug!(environment = %global.environment(), salt = %global.salt, "Building engine");
    Ok(RolloutEngine::new(table, global.environment()).with_salt(global.salt.as_str()))
}
