//! Scenario: Lifecycle hooks
//!
//! Hooks run through `sh -c` inside the release directory. A failing
//! pre_deploy aborts before cutover; a failing post_deploy rolls back.

use std::fs;

use releasectl::presentation::factory;
use releasectl::{DeployError, DeployOutcome};

use crate::common::*;

fn hooked_config(env: &TestEnv, origin: &GitOrigin, hooks: &str) -> String {
    format!(
        r#"
[apps.blog]
location = '{base}'
revisions = 5

[apps.blog.hooks]
{hooks}

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
fn scenario_hooks_run_inside_the_new_release() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    origin.commit("index.html", "v1");
    env.write_config(&hooked_config(
        &env,
        &origin,
        r#"pre_deploy = "pwd > built-in.txt"
post_deploy = "test -f built-in.txt && echo reloaded""#,
    ));

    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    assert!(outcome.is_success(), "{outcome:?}");

    let live = live_release(&env.base("blog")).unwrap();
    let recorded = fs::read_to_string(live.join("built-in.txt")).unwrap();
    assert_eq!(
        std::path::Path::new(recorded.trim()).file_name(),
        live.file_name()
    );
}

#[test]
fn scenario_failing_pre_deploy_keeps_current_release() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    origin.commit("index.html", "v1");
    env.write_config(&hooked_config(&env, &origin, ""));
    factory::create_engine(env.app("blog")).deploy().unwrap();
    let first = live_release(&env.base("blog")).unwrap();

    origin.commit("index.html", "v2");
    env.write_config(&hooked_config(
        &env,
        &origin,
        r#"pre_deploy = "echo 'asset build failed' >&2; exit 2""#,
    ));

    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    match &outcome {
        DeployOutcome::Aborted { release, error } => {
            assert!(!release.exists(), "aborted release should be deleted");
            assert!(
                matches!(error, DeployError::HookFailed { stderr, .. } if stderr == "asset build failed"),
                "{error}"
            );
        }
        other => panic!("expected abort, got {other:?}"),
    }
    assert_eq!(live_release(&env.base("blog")), Some(first.clone()));
    assert_eq!(release_dirs(&env.base("blog")), vec![first]);
}

#[test]
fn scenario_failing_post_deploy_rolls_back() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    origin.commit("index.html", "v1");
    env.write_config(&hooked_config(&env, &origin, ""));
    factory::create_engine(env.app("blog")).deploy().unwrap();
    let first = live_release(&env.base("blog")).unwrap();

    origin.commit("index.html", "v2");
    env.write_config(&hooked_config(
        &env,
        &origin,
        r#"post_deploy = "exit 1"
post_rollback = "touch rolled-back.txt""#,
    ));

    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    match &outcome {
        DeployOutcome::RolledBack {
            release, restored, ..
        } => {
            assert_eq!(restored, &first);
            assert!(!release.exists(), "failed release should be removed");
        }
        other => panic!("expected rollback, got {other:?}"),
    }
    assert_eq!(live_release(&env.base("blog")), Some(first.clone()));
    assert!(first.join("rolled-back.txt").is_file());
    assert_eq!(fs::read_to_string(first.join("index.html")).unwrap(), "v1");
}

#[test]
fn scenario_slow_hook_hits_timeout() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    origin.commit("index.html", "v1");
    env.write_config(&hooked_config(
        &env,
        &origin,
        "pre_deploy = \"sleep 5\"\ntimeout = 1",
    ));

    let started = std::time::Instant::now();
    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(5));

    match &outcome {
        DeployOutcome::Aborted { error, .. } => {
            assert!(error.to_string().contains("timed out"), "{error}");
        }
        other => panic!("expected abort, got {other:?}"),
    }
    assert!(live_release(&env.base("blog")).is_none());
}
