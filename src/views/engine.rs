//! Template lookup and rendering.
//!
//! # Responsibilities
//! - Walk a chain in order and return the first matching template
//! - Cache lookups per (chain, template name) when enabled
//! - Render with handlebars against a JSON locals object
//!
//! # Design Decisions
//! - Template files are read with tokio::fs (suspension only at I/O)
//! - A cache entry never crosses chains

use std::sync::Arc;

use dashmap::DashMap;
use handlebars::Handlebars;

use crate::views::chain::{ChainId, ViewDir, ViewResolutionChain};
use crate::views::{partials, ViewError};

/// Shared renderer for every mounted route.
pub struct ViewEngine {
    extension: String,
    cache_enabled: bool,
    registry: Handlebars<'static>,
    cache: DashMap<(ChainId, String), Arc<str>>,
}

impl ViewEngine {
    /// Create an engine for templates named `<name>.<extension>`.
    pub fn new(extension: impl Into<String>, cache_enabled: bool) -> Self {
        Self {
            extension: extension.into(),
            cache_enabled,
            registry: Handlebars::new(),
            cache: DashMap::new(),
        }
    }

    /// Find the source of `name`, consulting directories in chain order.
    pub async fn locate(
        &self,
        chain: &ViewResolutionChain,
        name: &str,
    ) -> Result<Arc<str>, ViewError> {
        let key = (chain.id(), name.to_string());
        if self.cache_enabled {
            if let Some(hit) = self.cache.get(&key) {
                return Ok(hit.value().clone());
            }
        }

        for dir in chain.dirs() {
            let found: Option<Arc<str>> = match dir {
                ViewDir::Path(path) => {
                    let file = path.join(format!("{}.{}", name, self.extension));
                    match tokio::fs::read_to_string(&file).await {
                        Ok(source) => Some(Arc::from(source)),
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                        Err(source) => return Err(ViewError::Io { path: file, source }),
                    }
                }
                ViewDir::Builtin => partials::lookup(name).map(Arc::from),
            };

            if let Some(source) = found {
                tracing::debug!(chain = %chain.id(), template = name, dir = %dir, "Template resolved");
                if self.cache_enabled {
                    self.cache.insert(key, source.clone());
                }
                return Ok(source);
            }
        }

        Err(ViewError::TemplateNotFound {
            name: name.to_string(),
            searched: chain.dirs().iter().map(ToString::to_string).collect(),
        })
    }

    /// Locate `name` in `chain` and render it with `locals`.
    pub async fn render(
        &self,
        chain: &ViewResolutionChain,
        name: &str,
        locals: &serde_json::Value,
    ) -> Result<String, ViewError> {
        let source = self.locate(chain, name).await?;
        self.registry
            .render_template(&source, locals)
            .map_err(|e| ViewError::Render {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Number of cached lookups.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine")
            .field("extension", &self.extension)
            .field("cache_enabled", &self.cache_enabled)
            .field("cached", &self.cache.len())
            .finish()
    }
}
