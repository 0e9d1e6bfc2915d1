//! Engine Factory
//!
//! Wires an [`Application`] to its infrastructure: one process runner shared
//! by every repository backend and the hook runner.

use std::rc::Rc;

use crate::application::DeploymentEngine;
use crate::domain::entities::Application;
use crate::domain::ports::CommandRunner;
use crate::infrastructure::{build_source, HookRunner, SystemCommandRunner};

/// Create an engine that runs real processes
pub fn create_engine(app: Application) -> DeploymentEngine {
    create_engine_with_runner(app, Rc::new(SystemCommandRunner::new()))
}

/// Create an engine on top of a specific process runner
pub fn create_engine_with_runner(
    app: Application,
    runner: Rc<dyn CommandRunner>,
) -> DeploymentEngine {
    let sources = app
        .repositories
        .iter()
        .map(|spec| build_source(&app.name, spec, Rc::clone(&runner)))
        .collect();
    let hooks = HookRunner::new(runner, app.hooks.timeout);
    DeploymentEngine::new(app, sources, hooks)
}
