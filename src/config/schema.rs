//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a journey
//! application. Plain data derives Serde traits for deserialization from
//! config files; capabilities (controller factories, themes) are skipped by
//! serde and supplied from code.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::controllers::ControllerFactory;
use crate::views::Theme;

/// Root configuration for a journey application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Journeys to mount, in registration order.
    pub routes: Vec<RouteConfig>,

    /// Base directory for every relative path below.
    /// Defaults to the current working directory.
    pub root: Option<PathBuf>,

    /// Shared (common) views directory.
    pub views: Option<PathBuf>,

    /// Shared fields directory.
    pub fields: Option<PathBuf>,

    /// Static asset directory served under `/public`.
    /// Defaults to `<root>/public`.
    pub public: Option<PathBuf>,

    /// Default controller for every step of every route.
    #[serde(skip)]
    pub base_controller: Option<ControllerFactory>,

    /// Opaque payload handed to every controller.
    pub app_config: serde_json::Value,

    pub protocol: Protocol,

    pub host: String,

    pub port: u16,

    /// Certificate material, required for `https`.
    pub tls: Option<TlsConfig>,

    /// Template file extension.
    pub view_engine: String,

    /// Cache template lookups per view chain.
    pub view_cache: bool,

    /// Theme providing its own view directories and a setup hook.
    #[serde(skip)]
    pub theme: Option<Arc<dyn Theme>>,

    /// Start listening as part of `bootstrap`.
    pub start: bool,

    /// Deployment environment (`development`, `production`, `test`, `ci`).
    pub env: String,

    /// Analytics tag exposed to templates as `gaTagId`.
    pub ga_tag_id: Option<String>,

    /// Mount the `/cookies` page.
    pub get_cookies: bool,

    /// Mount the `/terms-and-conditions` page.
    pub get_terms: bool,

    pub timeouts: TimeoutConfig,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            root: None,
            views: None,
            fields: None,
            public: None,
            base_controller: None,
            app_config: serde_json::Value::Null,
            protocol: Protocol::Http,
            host: "0.0.0.0".to_string(),
            port: 8080,
            tls: None,
            view_engine: "html".to_string(),
            view_cache: true,
            theme: None,
            start: true,
            env: "development".to_string(),
            ga_tag_id: None,
            get_cookies: true,
            get_terms: true,
            timeouts: TimeoutConfig::default(),
            max_body_size: 2 * 1024 * 1024, // 2MB
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// One journey: a set of steps sharing views, fields and a mount prefix.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Step path (e.g. `/one`) to step settings.
    pub steps: BTreeMap<String, StepConfig>,

    /// Route-specific views directory, consulted before the shared one.
    pub views: Option<PathBuf>,

    /// Route-specific fields directory.
    pub fields: Option<PathBuf>,

    /// Mount prefix (e.g. `/app_1`).
    pub base_url: Option<String>,

    /// Trailing parameter pattern appended to every step (e.g. `/:action?`).
    pub params: Option<String>,

    /// Route name; selects `<fields>/<name>` when `fields` is absent.
    pub name: Option<String>,

    /// Default controller for the steps of this route.
    #[serde(skip)]
    pub base_controller: Option<ControllerFactory>,
}

/// One URL-addressable step.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StepConfig {
    /// Controller for this step only.
    #[serde(skip)]
    pub controller: Option<ControllerFactory>,

    /// Template name; defaults to the step path without its leading `/`.
    pub template: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,

    /// Upper bound on draining in-flight requests during `stop`, in seconds.
    pub shutdown_drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_drain_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Overrides merged over the stored configuration by `App::start`.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<Protocol>,
}

impl StartOptions {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Merge into `config`; unset fields leave it untouched.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(protocol) = self.protocol {
            config.protocol = protocol;
        }
    }
}
