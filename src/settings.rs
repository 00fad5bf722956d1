use serde::Deserialize;

use crate::application::{AppError, ExpenseGrouping, SessionConfig};
use crate::domain::Currency;

pub const DEFAULT_CONFIG_PATH: &str = "pocketbook.toml";
const ENV_PREFIX: &str = "POCKETBOOK";

/// Layered settings: built-in defaults, then the optional TOML file, then
/// `POCKETBOOK_*` environment variables. CLI flags are applied on top by the
/// caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `category` or `type`
    pub group_by: String,
    pub default_currency: String,
    /// Width in characters of the longest bar in text charts.
    pub chart_width: usize,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            group_by: ExpenseGrouping::Category.as_str().to_string(),
            default_currency: Currency::Usd.as_str().to_string(),
            chart_width: 40,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn load(config_path: Option<&str>) -> Result<Self, AppError> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = config::Config::builder()
            // An explicitly named file must exist; the default one is optional.
            .add_source(config::File::with_name(path).required(config_path.is_some()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Validate the string-typed settings into a session configuration.
    pub fn session_config(&self) -> Result<SessionConfig, AppError> {
        Ok(SessionConfig {
            grouping: ExpenseGrouping::parse(&self.group_by)?,
            default_currency: Currency::parse(&self.default_currency)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chart_width, 40);
        assert_eq!(settings.session_config().unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "group_by = \"type\"\ndefault_currency = \"eur\"").unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.chart_width, 40);

        let config = settings.session_config().unwrap();
        assert_eq!(config.grouping, ExpenseGrouping::Type);
        assert_eq!(config.default_currency, Currency::Eur);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(matches!(
            Settings::load(Some("/nonexistent/pocketbook.toml")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_grouping_is_rejected() {
        let settings = Settings {
            group_by: "weekday".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.session_config(),
            Err(AppError::Parse(_))
        ));
    }
}
