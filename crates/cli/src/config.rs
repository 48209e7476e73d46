use crate::{env::EnvManager, error::CliError};
use chrono_tz::Tz;
use formatter::{FormatSettings, RenderOptions};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const API_URL: &str = "RVIEW_API_URL";
const MAX_TEXT_LEN: &str = "RVIEW_MAX_TEXT_LEN";
const CURRENCY_SYMBOL: &str = "RVIEW_CURRENCY_SYMBOL";
const CURRENCY_MIN: &str = "RVIEW_CURRENCY_MIN";
const CURRENCY_MAX: &str = "RVIEW_CURRENCY_MAX";
const INTEGER_CURRENCY: &str = "RVIEW_INTEGER_CURRENCY";
const LEGACY_PATTERNS: &str = "RVIEW_LEGACY_PATTERNS";
const TIMEZONE: &str = "RVIEW_TIMEZONE";
const DATETIME_FORMAT: &str = "RVIEW_DATETIME_FORMAT";
const MAX_COLUMN_WIDTH: &str = "RVIEW_MAX_COLUMN_WIDTH";

/// Effective settings of the CLI, assembled from defaults and `RVIEW_*`
/// variables.
#[derive(Debug, Clone, Serialize)]
pub struct CliConfig {
    pub api_url: String,
    pub format: FormatSettings,
    pub render: RenderOptions,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            format: FormatSettings::default(),
            render: RenderOptions::default(),
        }
    }
}

impl CliConfig {
    /// Process environment, overlaid with `env_file` when given, or with
    /// `~/.rview/env` when that file exists.
    pub fn load(env_file: Option<&str>) -> Result<Self, CliError> {
        let mut env = EnvManager::new();

        match env_file.map(PathBuf::from).or_else(default_env_file) {
            Some(path) => {
                debug!("Loading environment from {}", path.display());
                env.load_from_file(&path)?;
            }
            None => debug!("No env file found, using process environment"),
        }

        Self::from_env(&env)
    }

    pub fn from_env(env: &EnvManager) -> Result<Self, CliError> {
        let mut config = CliConfig::default();
        debug!(
            "Applying {} RVIEW_* variables",
            env.with_prefix("RVIEW_").len()
        );

        if let Some(url) = env.get(API_URL) {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }

        let format = &mut config.format;
        if let Some(len) = env.get_parsed::<usize>(MAX_TEXT_LEN)? {
            format.max_text_len = len;
        }
        if let Some(symbol) = env.get(CURRENCY_SYMBOL) {
            format.currency_symbol = symbol.to_string();
        }
        if let Some(min) = env.get_parsed::<f64>(CURRENCY_MIN)? {
            format.currency_min = min;
        }
        if let Some(max) = env.get_parsed::<f64>(CURRENCY_MAX)? {
            format.currency_max = max;
        }
        if let Some(flag) = env.get_bool(INTEGER_CURRENCY)? {
            format.detect_integer_currency = flag;
        }
        if let Some(flag) = env.get_bool(LEGACY_PATTERNS)? {
            format.legacy_patterns = flag;
        }
        if let Some(tz) = env.get(TIMEZONE) {
            format.timezone = tz
                .trim()
                .parse::<Tz>()
                .map_err(|e| CliError::Config(format!("Invalid value '{tz}' for {TIMEZONE}: {e}")))?;
        }
        if let Some(pattern) = env.get(DATETIME_FORMAT) {
            format.datetime_format = pattern.to_string();
        }
        format.validate()?;

        if let Some(width) = env.get_parsed::<usize>(MAX_COLUMN_WIDTH)? {
            if width == 0 {
                return Err(CliError::Config(format!(
                    "{MAX_COLUMN_WIDTH} must be positive"
                )));
            }
            config.render.max_column_width = width;
        }

        Ok(config)
    }
}

fn default_env_file() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".rview/env"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> EnvManager {
        EnvManager::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_env(&env(&[])).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.format, FormatSettings::default());
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_env(&env(&[
            ("RVIEW_API_URL", "https://qa.internal/"),
            ("RVIEW_MAX_TEXT_LEN", "20"),
            ("RVIEW_CURRENCY_SYMBOL", "€"),
            ("RVIEW_INTEGER_CURRENCY", "false"),
            ("RVIEW_LEGACY_PATTERNS", "0"),
            ("RVIEW_TIMEZONE", "America/New_York"),
            ("RVIEW_MAX_COLUMN_WIDTH", "12"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://qa.internal");
        assert_eq!(config.format.max_text_len, 20);
        assert_eq!(config.format.currency_symbol, "€");
        assert!(!config.format.detect_integer_currency);
        assert!(!config.format.legacy_patterns);
        assert_eq!(config.format.timezone, chrono_tz::America::New_York);
        assert_eq!(config.render.max_column_width, 12);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CliConfig::from_env(&env(&[("RVIEW_TIMEZONE", "Mars/Olympus")])),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            CliConfig::from_env(&env(&[
                ("RVIEW_CURRENCY_MIN", "100"),
                ("RVIEW_CURRENCY_MAX", "50")
            ])),
            Err(CliError::Settings(_))
        ));
        assert!(matches!(
            CliConfig::from_env(&env(&[("RVIEW_MAX_COLUMN_WIDTH", "0")])),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "RVIEW_DATETIME_FORMAT=\"%Y-%m-%d %H:%M\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.format.datetime_format, "%Y-%m-%d %H:%M");
    }
}
