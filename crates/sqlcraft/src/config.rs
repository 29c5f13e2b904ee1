//! Compiler configuration.
//!
//! A [`CompilerConfig`] is fixed when a `Compiler` is constructed and never
//! changes afterwards, so compilers with different formats can run side by
//! side on different threads.
//!
//! ```ignore
//! let config = sqlcraft::CompilerConfig::from_toml_str(r#"
//!     date_format = "%d/%m/%Y"
//!     derived_table_alias = "sub"
//! "#)?;
//! let compiler = sqlcraft::Compiler::with_config(&sqlcraft::dialect::MySql, config);
//! ```

use crate::error::{SqlError, SqlResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Immutable settings threaded through every compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// strftime format for values of native date comparisons.
    pub date_format: String,
    /// strftime format for the bounds produced by day-boundary expansion.
    pub datetime_format: String,
    /// Alias given to derived tables built from a callback.
    pub derived_table_alias: String,
    /// Truncate SQL in debug logs (in bytes). `None` logs the whole statement.
    pub max_logged_sql: Option<usize>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            derived_table_alias: "derived".to_string(),
            max_logged_sql: Some(200),
        }
    }
}

impl CompilerConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a TOML document; missing keys keep their defaults.
    ///
    /// The date formats are validated, so a bad strftime string fails here.
    pub fn from_toml_str(input: &str) -> SqlResult<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| SqlError::malformed(format!("invalid compiler config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both date formats are valid strftime strings.
    pub fn validate(&self) -> SqlResult<()> {
        check_format("date_format", &self.date_format)?;
        check_format("datetime_format", &self.datetime_format)
    }

    /// Override the date format.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Override the datetime format.
    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    /// Override the derived table alias.
    pub fn derived_table_alias(mut self, alias: impl Into<String>) -> Self {
        self.derived_table_alias = alias.into();
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> SqlResult<String> {
        render("date_format", &self.date_format, date.format(&self.date_format))
    }

    pub(crate) fn start_of_day(&self, date: NaiveDate) -> SqlResult<String> {
        let start = date.and_time(NaiveTime::MIN);
        render("datetime_format", &self.datetime_format, start.format(&self.datetime_format))
    }

    pub(crate) fn end_of_day(&self, date: NaiveDate) -> SqlResult<String> {
        let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let end = date.and_time(last);
        render("datetime_format", &self.datetime_format, end.format(&self.datetime_format))
    }
}

fn check_format(key: &str, format: &str) -> SqlResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid_format(key, format));
    }
    Ok(())
}

/// Format through `write!` so an unusable format surfaces as an error.
fn render(key: &str, format: &str, formatted: impl Display) -> SqlResult<String> {
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| invalid_format(key, format))?;
    Ok(out)
}

fn invalid_format(key: &str, format: &str) -> SqlError {
    SqlError::malformed(format!("invalid {key} '{format}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.derived_table_alias, "derived");
    }

    #[test]
    fn toml_overrides_keep_defaults() {
        let config = CompilerConfig::from_toml_str("date_format = \"%d/%m/%Y\"").unwrap();
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn toml_error_is_malformed() {
        let err = CompilerConfig::from_toml_str("date_format = 3").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn day_bounds() {
        let config = CompilerConfig::default();
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(config.format_date(day).unwrap(), "2024-02-29");
        assert_eq!(config.start_of_day(day).unwrap(), "2024-02-29 00:00:00");
        assert_eq!(config.end_of_day(day).unwrap(), "2024-02-29 23:59:59");
    }

    #[test]
    fn toml_rejects_bad_strftime() {
        let err = CompilerConfig::from_toml_str("date_format = \"%Q\"").unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("date_format"));

        let err = CompilerConfig::from_toml_str("datetime_format = \"%Y %\"").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn bad_format_from_setter_errors_instead_of_panicking() {
        let config = CompilerConfig::new().date_format("%Q");
        assert!(config.validate().is_err());
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(config.format_date(day).unwrap_err().is_malformed());
        assert!(config.start_of_day(day).is_ok());
    }
}
