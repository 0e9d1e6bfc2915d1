//! Scenario: Tracking release tags
//!
//! Journey: an application follows the newest `vX.Y.Z` tag instead of a
//! branch. Commits without a tag are never deployed.

use std::fs;

use releasectl::presentation::factory;
use releasectl::DeployOutcome;

use crate::common::*;

fn tagged_config(env: &TestEnv, origin: &GitOrigin) -> String {
    format!(
        r#"
[apps.shop]
location = '{base}'

[[apps.shop.repositories]]
name = "shop"
type = "git"
origin = '{origin}'
tags = '^v\d+\.\d+\.\d+$'
directory = "."
"#,
        base = env.base("shop").display(),
        origin = origin.origin(),
    )
}

#[test]
fn scenario_newest_tag_in_natural_order_is_deployed() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/shop"));
    origin.commit("VERSION", "1.2.0");
    origin.tag("v1.2.0");
    origin.commit("VERSION", "1.10.0");
    origin.tag("v1.10.0");
    origin.commit("VERSION", "1.9.0");
    origin.tag("v1.9.0");
    origin.commit("VERSION", "unreleased");
    origin.tag("nightly");
    env.write_config(&tagged_config(&env, &origin));

    let outcome = factory::create_engine(env.app("shop")).deploy().unwrap();
    assert!(outcome.is_success(), "{outcome:?}");

    let live = live_release(&env.base("shop")).unwrap();
    assert_eq!(fs::read_to_string(live.join("VERSION")).unwrap(), "1.10.0");
}

#[test]
fn scenario_untagged_commits_do_not_trigger_a_deploy() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/shop"));
    origin.commit("VERSION", "1.0.0");
    origin.tag("v1.0.0");
    env.write_config(&tagged_config(&env, &origin));
    factory::create_engine(env.app("shop")).deploy().unwrap();

    origin.commit("VERSION", "work in progress");
    let outcome = factory::create_engine(env.app("shop")).deploy().unwrap();
    assert!(matches!(outcome, DeployOutcome::UpToDate { .. }), "{outcome:?}");

    origin.tag("v1.0.1");
    let outcome = factory::create_engine(env.app("shop")).deploy().unwrap();
    assert!(matches!(outcome, DeployOutcome::Deployed { .. }), "{outcome:?}");
    let live = live_release(&env.base("shop")).unwrap();
    assert_eq!(
        fs::read_to_string(live.join("VERSION")).unwrap(),
        "work in progress"
    );
}

#[test]
fn scenario_no_matching_tag_is_a_configuration_error() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/shop"));
    origin.commit("VERSION", "1.0");
    origin.tag("release-1.0");
    env.write_config(&tagged_config(&env, &origin));

    let err = factory::create_engine(env.app("shop")).deploy().unwrap_err();
    assert_eq!(err.kind(), "configuration");
    assert!(err.to_string().contains("no tag matched"), "{err}");
    assert!(release_dirs(&env.base("shop")).is_empty());
}
