use crate::errors::{AppError, AppResult};
use crate::utils::date::{Zone, parse_weekday};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the configuration directory (used by tests and portable setups).
pub const HOME_ENV: &str = "TASKTIMER_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// IANA zone name used to group timings by day; `None` means the
    /// system local zone.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_first_day")]
    pub first_day_of_week: String,
    /// Timings shorter than this many seconds are left out of reports.
    #[serde(default)]
    pub ignore_less_than: i64,
}

fn default_first_day() -> String {
    "monday".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            timezone: None,
            first_day_of_week: default_first_day(),
            ignore_less_than: 0,
        }
    }
}

impl Config {
    /// Return the configuration directory (`~/.tasktimer` unless overridden)
    pub fn config_dir() -> PathBuf {
        if let Some(dir) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tasktimer")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("tasktimer.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("tasktimer.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Check the fields that are parsed lazily.
    pub fn validate(&self) -> AppResult<()> {
        self.zone()?;
        self.first_day()?;
        if self.ignore_less_than < 0 {
            return Err(AppError::Config(format!(
                "ignore_less_than must not be negative, got {}",
                self.ignore_less_than
            )));
        }
        Ok(())
    }

    pub fn zone(&self) -> AppResult<Zone> {
        Zone::parse(self.timezone.as_deref())
    }

    pub fn first_day(&self) -> AppResult<Weekday> {
        parse_weekday(&self.first_day_of_week)
    }

    /// Create the configuration directory and file.
    ///
    /// Returns the configuration to use. In test mode nothing is written
    /// besides the directory that will hold the database.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Self::default()
        };

        if !is_test {
            config.save(&Self::config_file())?;
        }

        Ok(config)
    }
}
