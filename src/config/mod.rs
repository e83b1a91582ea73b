use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_alert_secs() -> u64 {
    5
}

fn default_work_start() -> String {
    "08:00".to_string()
}

fn default_work_end() -> String {
    "20:00".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds before a transient alert auto-dismisses.
    #[serde(default = "default_alert_secs")]
    pub alert_secs: u64,

    /// Earliest bookable start time (HH:MM).
    #[serde(default = "default_work_start")]
    pub work_start: String,

    /// Latest bookable end time (HH:MM).
    #[serde(default = "default_work_end")]
    pub work_end: String,

    /// Override for the store file location (mainly for scripting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            alert_secs: default_alert_secs(),
            work_start: default_work_start(),
            work_end: default_work_end(),
            store_file: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("kaigi");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Working hours as parsed times; bad config falls back to defaults.
    pub fn working_hours(&self) -> (chrono::NaiveTime, chrono::NaiveTime) {
        let fallback_start = chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default();
        let fallback_end = chrono::NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default();

        let start = crate::format::parse_time(&self.work_start).unwrap_or_else(|_| {
            tracing::warn!("Invalid work_start '{}', using 08:00", self.work_start);
            fallback_start
        });
        let end = crate::format::parse_time(&self.work_end).unwrap_or_else(|_| {
            tracing::warn!("Invalid work_end '{}', using 20:00", self.work_end);
            fallback_end
        });
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            alert_secs: 8,
            work_start: "07:30".to_string(),
            work_end: "21:00".to_string(),
            store_file: Some(PathBuf::from("/tmp/store.toml")),
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.alert_secs, deserialized.alert_secs);
        assert_eq!(config.work_start, deserialized.work_start);
        assert_eq!(config.store_file, deserialized.store_file);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.alert_secs, 5);
        assert_eq!(config.work_start, "08:00");
        assert_eq!(config.work_end, "20:00");
    }

    #[test]
    fn invalid_working_hours_fall_back() {
        let config = AppConfig {
            work_start: "morning".to_string(),
            ..AppConfig::default()
        };
        let (start, end) = config.working_hours();
        assert_eq!(start, chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(end, chrono::NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    }
}
