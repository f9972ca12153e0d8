//! Default step controller.

use axum::response::{Html, IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::controllers::{Controller, ControllerOptions, StepError, StepRequest};

/// Renders the step's template through the route's view chain.
#[derive(Debug, Clone)]
pub struct BaseController {
    options: ControllerOptions,
}

impl BaseController {
    pub fn new(options: ControllerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Locals for one request: the step's base locals plus request data.
    pub fn locals(&self, request: &StepRequest) -> serde_json::Value {
        let mut locals = self.options.locals.clone();
        locals.insert("step".into(), self.options.route.clone().into());
        locals.insert("path".into(), request.path.clone().into());
        locals.insert("appConfig".into(), self.options.app_config.clone());
        locals.insert(
            "params".into(),
            serde_json::to_value(&request.params).unwrap_or_default(),
        );
        serde_json::Value::Object(locals)
    }

    /// Render `template` with `locals`.
    pub async fn render(
        &self,
        template: &str,
        locals: &serde_json::Value,
    ) -> Result<Response, StepError> {
        let html = self
            .options
            .engine
            .render(&self.options.views, template, locals)
            .await?;
        Ok(Html(html).into_response())
    }
}

impl Controller for BaseController {
    fn get(&self, request: StepRequest) -> BoxFuture<'_, Result<Response, StepError>> {
        async move {
            let locals = self.locals(&request);
            self.render(&self.options.template, &locals).await
        }
        .boxed()
    }
}
