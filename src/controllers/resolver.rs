//! Controller resolution.
//!
//! # Responsibilities
//! - Pick the most specific controller factory for a step
//! - Pair it with the options it will be constructed from
//!
//! # Design Decisions
//! - Order: step → route `base_controller` → app `base_controller` → default
//! - Resolution never constructs; the composer does, once per step

use std::fmt;
use std::sync::Arc;

use crate::config::schema::{AppConfig, RouteConfig, StepConfig};
use crate::controllers::{Controller, ControllerError, ControllerFactory, ControllerOptions};

/// Which level of configuration supplied the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerSource {
    Step,
    Route,
    App,
    Default,
}

impl fmt::Display for ControllerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControllerSource::Step => "step",
            ControllerSource::Route => "route",
            ControllerSource::App => "app",
            ControllerSource::Default => "default",
        };
        write!(f, "{}", s)
    }
}

/// A resolved, not yet constructed, controller for one step.
#[derive(Debug, Clone)]
pub struct ControllerBinding {
    pub factory: ControllerFactory,
    pub source: ControllerSource,
    pub options: ControllerOptions,
}

impl ControllerBinding {
    /// Construct the controller.
    pub fn construct(self) -> Result<Arc<dyn Controller>, ControllerError> {
        self.factory.construct(self.options)
    }
}

/// Resolve the controller for `step` of `route`.
pub fn resolve(
    step: &StepConfig,
    route: &RouteConfig,
    app: &AppConfig,
    options: ControllerOptions,
) -> ControllerBinding {
    let (factory, source) = if let Some(f) = &step.controller {
        (f.clone(), ControllerSource::Step)
    } else if let Some(f) = &route.base_controller {
        (f.clone(), ControllerSource::Route)
    } else if let Some(f) = &app.base_controller {
        (f.clone(), ControllerSource::App)
    } else {
        (ControllerFactory::base(), ControllerSource::Default)
    };

    ControllerBinding {
        factory,
        source,
        options,
    }
}
