//! Scenario: Branch deploys
//!
//! Journey: an operator deploys a site tracking `main`, redeploys without
//! changes, pushes a commit and deploys again.
//!
//! Success Criteria:
//! - Each deploy with a moved branch produces a new release behind `current`
//! - A deploy without changes touches nothing
//! - Old releases are pruned down to the retention count

use std::fs;

use releasectl::presentation::factory;
use releasectl::DeployOutcome;

use crate::common::*;

fn site_config(env: &TestEnv, origin: &GitOrigin, revisions: usize) -> String {
    format!(
        r#"
[apps.blog]
location = '{base}'
revisions = {revisions}

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
fn scenario_first_deploy_materializes_branch_head() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    let head = origin.commit("index.html", "<h1>v1</h1>");
    env.write_config(&site_config(&env, &origin, 3));

    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    assert!(matches!(outcome, DeployOutcome::Deployed { .. }), "{outcome:?}");

    let live = live_release(&env.base("blog")).expect("current should point at a release");
    assert_eq!(
        fs::read_to_string(live.join("index.html")).unwrap(),
        "<h1>v1</h1>"
    );
    assert!(!live.join(".git").exists(), "releases must not contain .git");

    let marker = fs::read_to_string(live.join(".releasectl")).unwrap();
    assert!(marker.contains(&head), "marker should record {head}: {marker}");
}

#[test]
fn scenario_redeploy_without_changes_is_a_no_op() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    origin.commit("index.html", "v1");
    env.write_config(&site_config(&env, &origin, 3));

    factory::create_engine(env.app("blog")).deploy().unwrap();
    let before = release_dirs(&env.base("blog"));

    let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
    match outcome {
        DeployOutcome::UpToDate { release } => assert_eq!(Some(release), live_release(&env.base("blog"))),
        other => panic!("expected up to date, got {other:?}"),
    }
    assert_eq!(release_dirs(&env.base("blog")), before);
}

#[test]
fn scenario_new_commit_is_reported_then_deployed() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    let first = origin.commit("index.html", "v1");
    env.write_config(&site_config(&env, &origin, 3));
    factory::create_engine(env.app("blog")).deploy().unwrap();

    let second = origin.commit("index.html", "v2");

    let report = factory::create_engine(env.app("blog")).status().unwrap();
    assert!(report.update_available());
    assert_eq!(report.repositories[0].deployed_revision.as_deref(), Some(first.as_str()));
    assert_eq!(report.repositories[0].latest_revision, second);

    factory::create_engine(env.app("blog")).deploy().unwrap();
    let live = live_release(&env.base("blog")).unwrap();
    assert_eq!(fs::read_to_string(live.join("index.html")).unwrap(), "v2");
    assert_eq!(release_dirs(&env.base("blog")).len(), 2);

    let report = factory::create_engine(env.app("blog")).status().unwrap();
    assert!(!report.update_available());
}

#[test]
fn scenario_old_releases_are_pruned_to_retention() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    env.write_config(&site_config(&env, &origin, 1));

    for n in 1..=4 {
        origin.commit("index.html", &format!("v{n}"));
        let outcome = factory::create_engine(env.app("blog")).deploy().unwrap();
        assert!(outcome.is_success(), "deploy {n}: {outcome:?}");
    }

    let releases = release_dirs(&env.base("blog"));
    assert_eq!(releases.len(), 2, "current plus one kept: {releases:?}");
    assert_eq!(live_release(&env.base("blog")).as_ref(), releases.last());
}

#[test]
fn scenario_repositories_share_one_release() {
    crate::require_git!();
    let env = TestEnv::new();
    let site = GitOrigin::init(&env.path("origins/site"));
    let theme = GitOrigin::init(&env.path("origins/theme"));
    let site_head = site.commit("index.html", "site");
    let theme_head = theme.commit("style.css", "body {}");
    env.write_config(&format!(
        r#"
[apps.blog]
location = '{base}'

[[apps.blog.repositories]]
name = "site"
type = "git"
origin = '{site}'
branch = "main"
directory = ""

[[apps.blog.repositories]]
name = "theme"
type = "git"
origin = '{theme}'
branch = "main"
directory = "themes/default"
"#,
        base = env.base("blog").display(),
        site = site.origin(),
        theme = theme.origin(),
    ));

    factory::create_engine(env.app("blog")).deploy().unwrap();

    let live = live_release(&env.base("blog")).unwrap();
    assert!(live.join("index.html").is_file());
    assert!(live.join("themes/default/style.css").is_file());
    let site_marker = fs::read_to_string(live.join(".releasectl")).unwrap();
    let theme_marker = fs::read_to_string(live.join("themes/default/.releasectl")).unwrap();
    assert!(site_marker.contains(&site_head));
    assert!(theme_marker.contains(&theme_head));

    // Only the theme moves; the whole application still gets a new release
    theme.commit("style.css", "body { margin: 0 }");
    factory::create_engine(env.app("blog")).deploy().unwrap();
    assert_eq!(release_dirs(&env.base("blog")).len(), 2);
}

#[test]
fn scenario_unknown_branch_fails_without_leaving_a_release() {
    crate::require_git!();
    let env = TestEnv::new();
    let origin = GitOrigin::init(&env.path("origins/blog"));
    origin.commit("index.html", "v1");
    env.write_config(&site_config(&env, &origin, 3).replace("branch = \"main\"", "branch = \"release\""));

    let err = factory::create_engine(env.app("blog")).deploy().unwrap_err();
    assert_eq!(err.kind(), "vcs");
    assert!(release_dirs(&env.base("blog")).is_empty());
    assert!(live_release(&env.base("blog")).is_none());
}
