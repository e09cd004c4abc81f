use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Environment prefix for overrides (`PHECO__REGISTRATION__SUBMIT_DELAY_MS=0`).
pub const ENV_PREFIX: &str = "PHECO";
const ENV_SEPARATOR: &str = "__";

#[pheco_derive::pheco_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration by layering an optional file with environment overrides.
///
/// 1. **File**: when `path` is given it must exist; the format follows the extension
///    (`.toml`, `.json`, `.yaml`). Without a path only defaults and the environment apply.
/// 2. **Environment**: variables prefixed with `PHECO__`, nested keys separated by `__`
///    (`PHECO__LOGGING__LEVEL=debug` sets `logging.level`).
///
/// Fields missing from both layers fall back to `T`'s serde defaults.
///
/// # Errors
/// * The given file is missing or unparsable.
/// * The merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use pheco_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct CliConfig {
///     verbose: bool,
/// }
///
/// let cfg: CliConfig = load_config(None::<&str>).unwrap_or_default();
/// assert!(!cfg.verbose);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    match &path {
        Some(path) => {
            let path: &Path = path.as_ref();
            info!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        },
        None => debug!("No config file given, using defaults and environment"),
    }

    builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[derive(Debug, Default, serde::Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        delay_ms: u64,
    }

    #[test]
    #[serial]
    fn missing_file_is_an_error() {
        let result = load_config::<Sample>(Some("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Config { context: Some(_), .. })));
    }

    #[test]
    #[serial]
    fn file_values_are_loaded() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "name = \"pharmeco\"\ndelay_ms = 25").unwrap();

        let cfg: Sample = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.name, "pharmeco");
        assert_eq!(cfg.delay_ms, 25);
    }

    #[test]
    #[serial]
    fn no_file_falls_back_to_defaults() {
        let cfg: Sample = load_config(None::<&Path>).unwrap();
        assert_eq!(cfg.delay_ms, 0);
    }
}
