//! Fuzz target for the decision ladder.
//!
//! Arbitrary configurations (including out-of-range and NaN rollouts) and
//! contexts must always produce a result consistent with the precedence rules.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rollgate_features::*;

#[derive(Debug, Arbitrary)]
struct FuzzDecision {
    feature: String,
    enabled: bool,
    rollout: f64,
    whitelist: Vec<String>,
    blacklist: Vec<String>,
    user_id: Option<String>,
    allow_anonymous: bool,
}

fuzz_target!(|input: FuzzDecision| {
    let config = FeatureConfig::rollout(input.rollout)
        .with_enabled(input.enabled)
        .with_whitelisted(input.whitelist)
        .with_blacklisted(input.blacklist);
    let table = FeatureTable::new().with_feature(Environment::Local, input.feature.clone(), config.clone());
    let engine = RolloutEngine::new(table, Environment::Local);

    let mut context = FeatureCheckContext::new().with_allow_anonymous(input.allow_anonymous);
    context.user_id = input.user_id;

    let result = engine.is_feature_enabled(&input.feature, &context);

    if !config.enabled {
        assert_eq!(result.reason, ReasonCode::FeatureDisabled);
    } else if let Some(user) = context.effective_user_id() {
        if config.blacklist.contains(user) {
            assert_eq!(result.reason, ReasonCode::UserBlacklisted);
        }
    } else {
        assert_eq!(result.enabled, input.allow_anonymous);
    }
    assert_eq!(result.enabled, engine.is_enabled(&input.feature, &context));
});
