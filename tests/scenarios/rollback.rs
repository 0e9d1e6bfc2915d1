//! Scenario: Manual rollback
//!
//! Journey: a bad release went live; the operator rolls back twice, then
//! finds nothing left to roll back to.

use std::fs;

use releasectl::presentation::factory;
use releasectl::RollbackOutcome;

use crate::common::*;

fn config(env: &TestEnv, origin: &GitOrigin) -> String {
    format!(
        r#"
[apps.blog]
location = '{base}'

[apps.blog.hooks]
pre_rollback = "test -f index.html"

[[apps.blog.repositories]]
name = "site"
type = "git"
origin = '{origin}'
branch = "main"
directory = "."
"#,
        base = env.base("blog").display(),
        origin = origin.origin(),
    )
}

#[test]
fn scenario_rollback_walks_back_one_release_at_a_time() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    env.write_config(&config(&env, &origin));
    for n in 1..=3 {
        origin.commit("index.html", &format!("v{n}"));
        factory::create_engine(env.app("blog")).deploy().unwrap();
    }
    let releases = release_dirs(&env.base("blog"));
    assert_eq!(releases.len(), 3);

    let outcome = factory::create_engine(env.app("blog")).rollback(None, None).unwrap();
    match &outcome {
        RollbackOutcome::Completed { restored, removed, .. } => {
            assert_eq!(restored, &releases[1]);
            assert_eq!(removed, &releases[2]);
        }
        other => panic!("expected completed rollback, got {other:?}"),
    }
    let live = live_release(&env.base("blog")).unwrap();
    assert_eq!(fs::read_to_string(live.join("index.html")).unwrap(), "v2");

    factory::create_engine(env.app("blog")).rollback(None, None).unwrap();
    assert_eq!(live_release(&env.base("blog")), Some(releases[0].clone()));
    assert_eq!(release_dirs(&env.base("blog")), vec![releases[0].clone()]);

    let err = factory::create_engine(env.app("blog"))
        .rollback(None, None)
        .unwrap_err();
    assert_eq!(err.kind(), "nothing_to_roll_back");
}

#[test]
fn scenario_rolled_back_revision_is_redeployed_next_time() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    env.write_config(&config(&env, &origin));
    origin.commit("index.html", "v1");
    factory::create_engine(env.app("blog")).deploy().unwrap();
    origin.commit("index.html", "v2");
    factory::create_engine(env.app("blog")).deploy().unwrap();

    factory::create_engine(env.app("blog")).rollback(None, None).unwrap();
    let report = factory::create_engine(env.app("blog")).status().unwrap();
    assert!(report.update_available());

    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    assert!(outcome.is_success());
    let live = live_release(&env.base("blog")).unwrap();
    assert_eq!(fs::read_to_string(live.join("index.html")).unwrap(), "v2");
}
