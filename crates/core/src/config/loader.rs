use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides, e.g.
/// `BINDERY_CONVERTER_TIMEOUT_SECS=120`.
const ENV_PREFIX: &str = "BINDERY_";

/// Load configuration from a TOML file, with `BINDERY_`-prefixed
/// environment variables taking precedence over file values.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    extract(Figment::from(Toml::file(path)))
}

/// Load configuration from a TOML string (useful for testing). The same
/// environment overrides apply.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Toml::string(toml_str)))
}

fn extract(base: Figment) -> Result<Config, ConfigError> {
    base.merge(Env::prefixed(ENV_PREFIX).split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
