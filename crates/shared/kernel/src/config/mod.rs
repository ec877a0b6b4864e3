use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[pdl_derive::pdl_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Plain environment variables understood for compatibility with existing deployments,
/// mapped to their config keys. They win over both the file and `PDL__*` variables.
pub const LEGACY_ENV_ALIASES: &[(&str, &str)] = &[
    ("SPARQL_ENDPOINT", "sparql.endpoint"),
    ("SPARQL_SUBSCRIPTION_KEY", "sparql.subscription_key"),
    ("API_KEY", "security.api_key"),
    ("BONSAI_URL", "search.url"),
    ("PORT", "server.port"),
];

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: `path` (any extension the `config` crate understands), defaulting to
///    `server`. A missing file is not an error; every section has defaults.
/// 2. **Environment Overrides**: variables prefixed with `PDL__`, nested with double
///    underscores (`PDL__SPARQL__ENDPOINT` maps to `sparql.endpoint`).
/// 3. **Legacy Variables**: see [`LEGACY_ENV_ALIASES`].
///
/// # Errors
/// Returns an error when the file cannot be parsed or the merged values do not match `T`.
///
/// # Example
/// ```rust
/// use pdl_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with_env(path, std::env::vars().collect())
}

/// [`load_config`] against an explicit set of environment variables instead of the
/// process environment.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Map<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let mut builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix("PDL")
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(Some(env.clone())),
        );

    for (variable, key) in LEGACY_ENV_ALIASES {
        let value = env.get(*variable).filter(|value| !value.trim().is_empty()).cloned();
        builder = builder.set_override_option(*key, value).context("Applying legacy variable")?;
    }

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
