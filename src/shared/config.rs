//! Application configuration. Data directory, bind address, report options.

use crate::domain::DomainError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Directory holding the five record files when `REVINTEL_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// Months shown by `/api/revenue-trend` unless configured otherwise.
pub const DEFAULT_TREND_MONTHS: usize = 6;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory with accounts/reps/deals/activities/targets JSON. Read from REVINTEL_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Listen host. Read from REVINTEL_HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// Listen port. Read from REVINTEL_PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// Months returned by the revenue trend. Read from REVINTEL_TREND_MONTHS.
    #[serde(default)]
    pub trend_months: Option<usize>,

    /// Pin "today" (YYYY-MM-DD) for reproducible reports. Read from REVINTEL_AS_OF.
    #[serde(default)]
    pub as_of: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("REVINTEL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the optional file
        c = c.add_source(config::Environment::with_prefix("REVINTEL").try_parsing(true));
        c.build()?.try_deserialize()
    }

    /// Returns the data directory. Defaults to `./data`.
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    /// Returns `host:port` to bind. Defaults to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> String {
        format!(
            "{}:{}",
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT)
        )
    }

    pub fn trend_months_or_default(&self) -> usize {
        self.trend_months.unwrap_or(DEFAULT_TREND_MONTHS)
    }

    /// Parsed `as_of` date. `Ok(None)` when unset; an error when set but not `YYYY-MM-DD`.
    pub fn as_of_date(&self) -> Result<Option<NaiveDate>, DomainError> {
        match self.as_of.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| DomainError::Config(format!("REVINTEL_AS_OF={s}: {e}"))),
        }
    }
}
