//! `check`: validate configuration without touching any release

use anyhow::Result;
use tracing::debug;

use releasectl::config::LoadedConfig;
use releasectl::infrastructure::backend_available;
use releasectl::presentation::output::{self, OutputFormat};

pub fn cmd_check(loaded: &LoadedConfig, format: OutputFormat) -> Result<bool> {
    if loaded.applications.is_empty() {
        anyhow::bail!("no applications configured");
    }

    let mut all_ok = true;
    for (name, app) in &loaded.applications {
        let (repositories, problems) = match app {
            Ok(app) => {
                let problems: Vec<String> = app
                    .repositories
                    .iter()
                    .filter(|spec| !backend_available(spec))
                    .map(|spec| {
                        format!(
                            "repository '{}': executable `{}` not found",
                            spec.name, spec.executable
                        )
                    })
                    .collect();
                (app.repositories.len(), problems)
            }
            Err(e) => (0, vec![e.to_string()]),
        };
        debug!(app = %name, problems = problems.len(), "checked application");

        match format {
            OutputFormat::Text => println!(
                "{}",
                output::render_check_text(name, repositories, &problems)
            ),
            OutputFormat::Json => {
                output::emit(&output::check_json(name, repositories, &problems))?
            }
        }
        all_ok &= problems.is_empty();
    }
    Ok(all_ok)
}
