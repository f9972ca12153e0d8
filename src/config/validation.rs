//! Configuration validation.
//!
//! # Responsibilities
//! - Structural checks (routes present, every route has steps)
//! - Resolve and check fields/views directories against the filesystem
//! - Expand every step into its final mount paths and reject collisions
//!
//! # Design Decisions
//! - Fail fast: the first failing check aborts, nothing partial is returned
//! - Runs synchronously, before any listener or async resource exists
//! - Error messages carry the resolved absolute path

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AppConfig, Protocol, RouteConfig, StepConfig};
use crate::routing::matcher::{self, MountPath};

/// Template of a step mounted at `/` when none is configured.
pub const INDEX_TEMPLATE: &str = "index";

/// Configuration rejected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Must be called with a list of routes")]
    MissingRoutes,

    #[error("Each route must define a set of one or more steps (route {route})")]
    MissingSteps { route: usize },

    #[error("Cannot find fields at {}", path.display())]
    InvalidFieldsPath { path: PathBuf },

    #[error("Cannot find route fields at {}", path.display())]
    InvalidRouteFieldsPath { path: PathBuf },

    #[error("Cannot find views at {}", path.display())]
    InvalidViewsPath { path: PathBuf },

    #[error("Cannot find route views at {}", path.display())]
    InvalidRouteViewsPath { path: PathBuf },

    #[error("Cannot find theme views at {}", path.display())]
    InvalidThemeViewsPath { path: PathBuf },

    #[error("Step path {step:?} in route {route} is invalid: {reason}")]
    InvalidStepPath {
        route: usize,
        step: String,
        reason: &'static str,
    },

    #[error("Base url {base_url:?} in route {route} is invalid: {reason}")]
    InvalidBaseUrl {
        route: usize,
        base_url: String,
        reason: &'static str,
    },

    #[error("Invalid params pattern {pattern:?} in route {route}: {reason}")]
    InvalidParams {
        route: usize,
        pattern: String,
        reason: &'static str,
    },

    #[error("Path {path} is mounted by both route {first} and route {second}")]
    DuplicateMountPath {
        path: String,
        first: usize,
        second: usize,
    },

    #[error("protocol https requires a tls section with cert_path and key_path")]
    MissingTls,
}

/// A configuration that passed every check, with all paths resolved.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// The configuration as supplied, with `root` made absolute.
    pub config: AppConfig,
    pub root: PathBuf,
    /// Shared views directory.
    pub views: Option<PathBuf>,
    /// Shared fields directory.
    pub fields: Option<PathBuf>,
    /// Directories contributed by the theme, in theme order.
    pub theme_views: Vec<PathBuf>,
    /// Static asset directory.
    pub public: PathBuf,
    pub routes: Vec<ValidatedRoute>,
}

/// One route with resolved directories and mount paths.
#[derive(Debug, Clone)]
pub struct ValidatedRoute {
    /// Position in `AppConfig::routes`.
    pub index: usize,
    pub config: RouteConfig,
    pub views: Option<PathBuf>,
    pub fields: Option<PathBuf>,
    /// Normalized prefix, empty for the root.
    pub base_url: String,
    pub steps: Vec<ValidatedStep>,
}

impl ValidatedRoute {
    /// Route label for logs and metrics.
    pub fn label(&self) -> String {
        self.config
            .name
            .clone()
            .unwrap_or_else(|| format!("route-{}", self.index))
    }
}

/// One step with its final mount paths.
#[derive(Debug, Clone)]
pub struct ValidatedStep {
    /// Step path as configured (`/one`).
    pub path: String,
    pub config: StepConfig,
    pub mount_paths: Vec<MountPath>,
}

impl ValidatedStep {
    /// Template rendered by the default controller. The root step `/`
    /// renders `index`.
    pub fn template(&self) -> String {
        match &self.config.template {
            Some(t) => t.clone(),
            None => match self.path.trim_matches('/') {
                "" => INDEX_TEMPLATE.to_string(),
                name => name.to_string(),
            },
        }
    }
}

/// Validate a configuration.
pub fn validate_config(config: AppConfig) -> Result<ValidatedConfig, ConfigError> {
    if config.routes.is_empty() {
        return Err(ConfigError::MissingRoutes);
    }
    for (index, route) in config.routes.iter().enumerate() {
        if route.steps.is_empty() {
            return Err(ConfigError::MissingSteps { route: index });
        }
    }
    if config.protocol == Protocol::Https && config.tls.is_none() {
        return Err(ConfigError::MissingTls);
    }

    let root = absolute_root(config.root.as_deref());

    let fields = match &config.fields {
        Some(p) => Some(existing(resolve(&root, p), |path| {
            ConfigError::InvalidFieldsPath { path }
        })?),
        None => None,
    };
    let views = match &config.views {
        Some(p) => Some(existing(resolve(&root, p), |path| {
            ConfigError::InvalidViewsPath { path }
        })?),
        None => None,
    };

    let mut theme_views = Vec::new();
    if let Some(theme) = &config.theme {
        for dir in theme.views() {
            theme_views.push(existing(resolve(&root, &dir), |path| {
                ConfigError::InvalidThemeViewsPath { path }
            })?);
        }
    }

    let public = match &config.public {
        Some(p) => resolve(&root, p),
        None => root.join("public"),
    };

    let mut routes = Vec::with_capacity(config.routes.len());
    let mut mounted: HashMap<String, usize> = HashMap::new();

    for (index, route) in config.routes.iter().enumerate() {
        let route_fields = match (&route.fields, &route.name, &fields) {
            (Some(p), _, _) => Some(resolve(&root, p)),
            (None, Some(name), Some(shared)) => Some(shared.join(name)),
            (None, _, shared) => shared.clone(),
        };
        let route_fields = match route_fields {
            Some(path) if route.fields.is_some() || route.name.is_some() => {
                Some(existing(path, |path| ConfigError::InvalidRouteFieldsPath { path })?)
            }
            other => other,
        };

        let route_views = match &route.views {
            Some(p) => Some(existing(resolve(&root, p), |path| {
                ConfigError::InvalidRouteViewsPath { path }
            })?),
            None => None,
        };

        let base_url = matcher::normalize_base_url(route.base_url.as_deref());
        matcher::check_literal(&base_url).map_err(|reason| ConfigError::InvalidBaseUrl {
            route: index,
            base_url: base_url.clone(),
            reason,
        })?;
        let suffixes = matcher::expand_params(route.params.as_deref()).map_err(|e| {
            ConfigError::InvalidParams {
                route: index,
                pattern: e.pattern,
                reason: e.reason,
            }
        })?;

        let mut steps = Vec::with_capacity(route.steps.len());
        for (step, step_config) in &route.steps {
            let invalid_step = |reason| ConfigError::InvalidStepPath {
                route: index,
                step: step.clone(),
                reason,
            };
            if !step.starts_with('/') {
                return Err(invalid_step("must start with '/'"));
            }
            matcher::check_literal(step).map_err(invalid_step)?;

            let mount_paths = matcher::mount_paths(&base_url, step, &suffixes);
            for mount in &mount_paths {
                let key = matcher::conflict_key(&mount.path);
                if let Some(first) = mounted.insert(key, index) {
                    return Err(ConfigError::DuplicateMountPath {
                        path: mount.path.clone(),
                        first,
                        second: index,
                    });
                }
            }
            steps.push(ValidatedStep {
                path: step.clone(),
                config: step_config.clone(),
                mount_paths,
            });
        }

        routes.push(ValidatedRoute {
            index,
            config: route.clone(),
            views: route_views,
            fields: route_fields,
            base_url,
            steps,
        });
    }

    let mut config = config;
    config.root = Some(root.clone());

    Ok(ValidatedConfig {
        config,
        root,
        views,
        fields,
        theme_views,
        public,
        routes,
    })
}

fn absolute_root(root: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    match root {
        Some(r) => normalize(&cwd.join(r)),
        None => cwd,
    }
}

/// Join `path` onto `root` (absolute paths win) and fold `.`/`..` lexically.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    normalize(&root.join(path))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn existing(
    path: PathBuf,
    err: impl FnOnce(PathBuf) -> ConfigError,
) -> Result<PathBuf, ConfigError> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(err(path))
    }
}
