use anyhow::Result;

use releasectl::domain::entities::Application;
use releasectl::presentation::factory;
use releasectl::presentation::output::{self, OutputFormat};

/// Roll back to the newest release that is not current
pub fn cmd_rollback(app: Application, format: OutputFormat) -> Result<bool> {
    let name = app.name.clone();
    let engine = factory::create_engine(app);
    let result = engine.rollback(None, None);

    match format {
        OutputFormat::Text => println!("{}", output::render_rollback_text(&name, &result)),
        OutputFormat::Json => output::emit(&output::rollback_json(&name, &result))?,
    }
    Ok(matches!(&result, Ok(outcome) if outcome.is_success()))
}
