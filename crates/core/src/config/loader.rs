use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for overrides, e.g. `TUNEFETCH_SPOTIFY__CLIENT_SECRET`.
pub const ENV_PREFIX: &str = "TUNEFETCH_";

/// Variable holding the config file path. Shares the prefix but is not an override.
pub const CONFIG_PATH_VAR: &str = "TUNEFETCH_CONFIG";

fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__")
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::from(Toml::file(path))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a TOML string, without environment overrides
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
