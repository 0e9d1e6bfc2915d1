//! Output Rendering
//!
//! Text for humans, NDJSON (one object per line) for scripts. Rendering is
//! kept separate from printing so it can be snapshot-tested.

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::application::{DeployOutcome, RollbackOutcome, StatusReport};
use crate::config::ConfigWarning;
use crate::error::{DeployError, DeployResult};

/// Output format selected by `--json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Write a single NDJSON event
pub fn write_event(out: &mut impl Write, event: &Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write an event to stdout
pub fn emit(event: &Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, event)
}

/// Last path component, which for a release is its revision id
fn release_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn error_json(error: &DeployError) -> Value {
    json!({ "kind": error.kind(), "message": error.to_string() })
}

// ---------------------------------------------------------------------------
// Deploy
// ---------------------------------------------------------------------------

pub fn render_deploy_text(app: &str, result: &DeployResult<DeployOutcome>) -> String {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => return format!("{app}: deploy failed: {e}"),
    };
    match outcome {
        DeployOutcome::UpToDate { release } => {
            format!("{app}: up to date (release {})", release_name(release))
        }
        DeployOutcome::Deployed {
            revision, pruned, ..
        } => match pruned.len() {
            0 => format!("{app}: deployed release {revision}"),
            n => format!("{app}: deployed release {revision}, pruned {n} old release(s)"),
        },
        DeployOutcome::Aborted { error, .. } => {
            format!("{app}: deploy aborted, current release unchanged: {error}")
        }
        DeployOutcome::RolledBack {
            restored, error, ..
        } => format!(
            "{app}: deploy failed, rolled back to release {}: {error}",
            release_name(restored)
        ),
        DeployOutcome::RollbackFailed {
            error,
            rollback_error,
            ..
        } => format!("{app}: deploy failed: {error}\n{app}: rollback failed: {rollback_error}"),
        DeployOutcome::LeftBroken { release, error } => format!(
            "{app}: deploy failed with no previous release, release {} left live: {error}",
            release_name(release)
        ),
    }
}

pub fn deploy_json(app: &str, result: &DeployResult<DeployOutcome>) -> Value {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            return json!({
                "event": "deploy",
                "app": app,
                "outcome": "error",
                "success": false,
                "error": error_json(e),
            })
        }
    };

    let mut event = json!({
        "event": "deploy",
        "app": app,
        "outcome": outcome.kind(),
        "success": outcome.is_success(),
    });
    let fields = match outcome {
        DeployOutcome::UpToDate { release } => json!({ "release": release }),
        DeployOutcome::Deployed {
            revision,
            release,
            pruned,
        } => json!({ "revision": revision.as_str(), "release": release, "pruned": pruned }),
        DeployOutcome::Aborted { release, error } | DeployOutcome::LeftBroken { release, error } => {
            json!({ "release": release, "error": error_json(error) })
        }
        DeployOutcome::RolledBack {
            release,
            restored,
            error,
        } => json!({ "release": release, "restored": restored, "error": error_json(error) }),
        DeployOutcome::RollbackFailed {
            release,
            error,
            rollback_error,
        } => json!({
            "release": release,
            "error": error_json(error),
            "rollback_error": error_json(rollback_error),
        }),
    };
    merge_fields(&mut event, fields);
    event
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

pub fn render_rollback_text(app: &str, result: &DeployResult<RollbackOutcome>) -> String {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => return format!("{app}: rollback failed: {e}"),
    };
    match outcome {
        RollbackOutcome::Completed {
            restored, removed, ..
        } => format!(
            "{app}: rolled back to release {}, removed {}",
            release_name(restored),
            release_name(removed)
        ),
        RollbackOutcome::Aborted { error } => {
            format!("{app}: rollback aborted, current release unchanged: {error}")
        }
        RollbackOutcome::PostRollbackFailed {
            restored, error, ..
        } => format!(
            "{app}: rolled back to release {} but post_rollback failed: {error}",
            release_name(restored)
        ),
    }
}

pub fn rollback_json(app: &str, result: &DeployResult<RollbackOutcome>) -> Value {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            return json!({
                "event": "rollback",
                "app": app,
                "outcome": "error",
                "success": false,
                "error": error_json(e),
            })
        }
    };

    let mut event = json!({
        "event": "rollback",
        "app": app,
        "outcome": outcome.kind(),
        "success": outcome.is_success(),
    });
    let fields = match outcome {
        RollbackOutcome::Completed {
            restored,
            removed,
            pruned,
        } => json!({ "restored": restored, "removed": removed, "pruned": pruned }),
        RollbackOutcome::Aborted { error } => json!({ "error": error_json(error) }),
        RollbackOutcome::PostRollbackFailed {
            restored,
            removed,
            error,
        } => json!({ "restored": restored, "removed": removed, "error": error_json(error) }),
    };
    merge_fields(&mut event, fields);
    event
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub fn render_status_text(app: &str, result: &DeployResult<StatusReport>) -> String {
    match result {
        Ok(report) => report.lines().join("\n"),
        Err(e) => format!("{app}: status unavailable: {e}"),
    }
}

pub fn status_json(app: &str, result: &DeployResult<StatusReport>) -> Value {
    match result {
        Ok(report) => {
            let mut event = json!({ "event": "status", "success": true });
            merge_fields(
                &mut event,
                serde_json::to_value(report).unwrap_or(Value::Null),
            );
            event
        }
        Err(e) => json!({
            "event": "status",
            "application": app,
            "success": false,
            "error": error_json(e),
        }),
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub fn render_warning_text(warning: &ConfigWarning) -> String {
    format!("warning: {warning}")
}

pub fn warning_json(warning: &ConfigWarning) -> Value {
    json!({
        "event": "config_warning",
        "key": warning.key,
        "file": warning.file,
        "line": warning.line,
        "suggestion": warning.suggestion,
        "message": warning.to_string(),
    })
}

/// An application whose configuration did not validate
pub fn render_invalid_app_text(app: &str, error: &DeployError) -> String {
    format!("{app}: skipped: {error}")
}

pub fn invalid_app_json(command: &str, app: &str, error: &DeployError) -> Value {
    json!({
        "event": command,
        "app": app,
        "outcome": "invalid_configuration",
        "success": false,
        "error": error_json(error),
    })
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

pub fn render_check_text(app: &str, repositories: usize, problems: &[String]) -> String {
    if problems.is_empty() {
        return format!("{app}: ok ({repositories} repositories)");
    }
    let mut text = format!("{app}: {} problem(s)", problems.len());
    for problem in problems {
        text.push_str("\n  ");
        text.push_str(problem);
    }
    text
}

pub fn check_json(app: &str, repositories: usize, problems: &[String]) -> Value {
    json!({
        "event": "check",
        "app": app,
        "repositories": repositories,
        "success": problems.is_empty(),
        "problems": problems,
    })
}

fn merge_fields(event: &mut Value, fields: Value) {
    if let (Value::Object(event), Value::Object(fields)) = (event, fields) {
        event.extend(fields);
    }
}
