use anyhow::Result;

use releasectl::domain::entities::Application;
use releasectl::presentation::factory;
use releasectl::presentation::output::{self, OutputFormat};

pub fn cmd_status(app: Application, format: OutputFormat) -> Result<bool> {
    let name = app.name.clone();
    let engine = factory::create_engine(app);
    let result = engine.status();

    match format {
        OutputFormat::Text => println!("{}", output::render_status_text(&name, &result)),
        OutputFormat::Json => output::emit(&output::status_json(&name, &result))?,
    }
    Ok(result.is_ok())
}
