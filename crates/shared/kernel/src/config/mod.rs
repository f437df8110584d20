use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default configuration file stem, resolved against the working directory.
pub const DEFAULT_CONFIG: &str = "modkit";
/// Environment prefix for overrides, e.g. `MODKIT__MODULES__BASE_PATH`.
pub const ENV_PREFIX: &str = "MODKIT";

#[modkit_derive::modkit_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: a file, then `MODKIT__`-prefixed environment overrides.
///
/// 1. **Base file**: `path`, or `modkit` (any extension the `config` crate understands).
///    The default file is optional; an explicitly named one is required.
/// 2. **Environment**: `MODKIT__SECTION__KEY` maps to `section.key`.
///
/// # Errors
/// * An explicitly named file does not exist or cannot be parsed.
/// * The merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use modkit_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     port: u16,
/// }
///
/// let cfg: Settings = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("modules.modules")
                .try_parsing(true),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
