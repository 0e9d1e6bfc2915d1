//! Command handlers
//!
//! Each handler runs one application and reports whether it succeeded. A
//! failing application never stops the next one.

mod check;
mod deploy;
mod rollback;
mod status;

use anyhow::{bail, Result};
use tracing::{debug, error, warn};

use releasectl::config::{self, LoadedConfig};
use releasectl::domain::entities::Application;
use releasectl::error::DeployResult;
use releasectl::infrastructure::{default_lock_path, RunLock};
use releasectl::presentation::output::{self, OutputFormat};
use releasectl::presentation::{Cli, Commands, ALL_APPS};

type AppHandler = fn(Application, OutputFormat) -> Result<bool>;

/// Run the parsed command line. `Ok(false)` means at least one application
/// failed.
pub fn run(cli: &Cli) -> Result<bool> {
    let format = OutputFormat::from_json_flag(cli.json);
    let paths = config::discover(&cli.config);
    let loaded = config::load(&paths)?;
    debug!(sources = ?loaded.sources, "configuration loaded");
    report_warnings(&loaded, format)?;

    let (selection, handler): (&str, AppHandler) = match &cli.command {
        Commands::Check => return check::cmd_check(&loaded, format),
        Commands::Deploy { app } => (app.as_str(), deploy::cmd_deploy as AppHandler),
        Commands::Rollback { app } => (app.as_str(), rollback::cmd_rollback as AppHandler),
        Commands::Status { app } => (app.as_str(), status::cmd_status as AppHandler),
    };
    let selected = select_applications(&loaded, selection)?;

    let _lock = if cli.command.mutates() && !cli.force {
        let path = loaded.lock_file.clone().unwrap_or_else(default_lock_path);
        Some(RunLock::acquire(&path)?)
    } else {
        if cli.force {
            warn!("running without the run lock");
        }
        None
    };

    let mut all_succeeded = true;
    for (name, app) in selected {
        let succeeded = match app {
            Ok(app) => handler(app.clone(), format)?,
            Err(e) => {
                error!(app = name, error = %e, "skipping application with invalid configuration");
                match format {
                    OutputFormat::Text => println!("{}", output::render_invalid_app_text(name, e)),
                    OutputFormat::Json => {
                        output::emit(&output::invalid_app_json(cli.command.name(), name, e))?
                    }
                }
                false
            }
        };
        all_succeeded &= succeeded;
    }
    Ok(all_succeeded)
}

/// `all` selects every application; anything else must name one exactly
fn select_applications<'a>(
    loaded: &'a LoadedConfig,
    selection: &str,
) -> Result<Vec<(&'a str, &'a DeployResult<Application>)>> {
    if loaded.applications.is_empty() {
        bail!("no applications configured");
    }

    let selected: Vec<_> = loaded
        .applications
        .iter()
        .filter(|(name, _)| selection == ALL_APPS || name == selection)
        .map(|(name, app)| (name.as_str(), app))
        .collect();

    if selected.is_empty() {
        bail!(
            "unknown application '{}'; configured applications: {}",
            selection,
            loaded.application_names().join(", ")
        );
    }
    Ok(selected)
}

fn report_warnings(loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
    for warning in &loaded.warnings {
        match format {
            OutputFormat::Text => eprintln!("{}", output::render_warning_text(warning)),
            OutputFormat::Json => output::emit(&output::warning_json(warning))?,
        }
    }
    Ok(())
}
