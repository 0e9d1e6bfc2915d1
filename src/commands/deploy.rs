use anyhow::Result;

use releasectl::domain::entities::Application;
use releasectl::presentation::factory;
use releasectl::presentation::output::{self, OutputFormat};

pub fn cmd_deploy(app: Application, format: OutputFormat) -> Result<bool> {
    let name = app.name.clone();
    let engine = factory::create_engine(app);
    let result = engine.deploy();

    match format {
        OutputFormat::Text => println!("{}", output::render_deploy_text(&name, &result)),
        OutputFormat::Json => output::emit(&output::deploy_json(&name, &result))?,
    }
    Ok(matches!(&result, Ok(outcome) if outcome.is_success()))
}
