use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level host configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub modules: ModulesConfig,
    pub logging: LoggingConfig,
    /// Host configuration trees keyed by namespace. Values here win over module `Config/` files.
    pub config: Map<String, Value>,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

impl From<AppConfigInner> for AppConfig {
    fn from(inner: AppConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Module layout: where modules live and how their namespaces are spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Directory holding one subdirectory per module.
    pub base_path: PathBuf,
    /// Application source root for app-level (non-module) artifacts.
    pub app_path: PathBuf,
    /// Root namespace; modules live under `{root}::Modules::{Name}`.
    pub root_namespace: String,
    /// File under `Routes/` handed to the route loader.
    pub route_file: String,
    /// Extension of generated source files.
    pub source_extension: String,
    /// Declared module names, loaded in this order.
    pub modules: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("app/Modules"),
            app_path: PathBuf::from("app"),
            root_namespace: "App".to_owned(),
            route_file: "web.toml".to_owned(),
            source_extension: "rs".to_owned(),
            modules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub console: bool,
    /// Level name (`trace`..`error`, `off`).
    pub level: String,
    /// Raw filter directives; overrides `RUST_LOG` when set.
    pub filter: Option<String>,
    pub directory: Option<PathBuf>,
    pub rotation: LogRotation,
    pub max_files: usize,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: true,
            level: "info".to_owned(),
            filter: None,
            directory: None,
            rotation: LogRotation::Daily,
            max_files: 10,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}
