use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::DB_FILE;
use crate::error::{MonsteraError, Result};
use crate::parser::NumberFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: char,
}

fn default_decimal_separator() -> char {
    NumberFormat::default().decimal_separator
}

fn default_grouping_separator() -> char {
    NumberFormat::default().grouping_separator
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            decimal_separator: default_decimal_separator(),
            grouping_separator: default_grouping_separator(),
        }
    }
}

impl Settings {
    /// The configured separators, rejected if they collide or are digits.
    pub fn number_format(&self) -> Result<NumberFormat> {
        NumberFormat::new(self.decimal_separator, self.grouping_separator)
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DB_FILE)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("monstera")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("monstera")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    settings.number_format()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| MonsteraError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monstera").join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            decimal_separator: '.',
            grouping_separator: ',',
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.number_format().unwrap(), NumberFormat::POINT);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(loaded.number_format().unwrap(), NumberFormat::default());
    }

    #[test]
    fn test_save_rejects_equal_separators() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            decimal_separator: ',',
            grouping_separator: ',',
        };
        let err = save_settings_to(&path, &settings).unwrap_err();
        assert!(matches!(err, MonsteraError::Settings(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_hand_edited_equal_separators_are_rejected_on_use() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/tmp/test", "decimal_separator": ",", "grouping_separator": ","}"#,
        )
        .unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert!(matches!(
            loaded.number_format(),
            Err(MonsteraError::Settings(_))
        ));
    }

    #[test]
    fn test_digit_separator_is_rejected() {
        let settings = Settings {
            decimal_separator: '5',
            ..Settings::default()
        };
        assert!(matches!(
            settings.number_format(),
            Err(MonsteraError::Settings(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(!s.data_dir.is_empty());
        assert_eq!(s.number_format().unwrap(), NumberFormat::default());
        assert!(s.db_path().ends_with("monstera.db"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.decimal_separator, ',');
        assert_eq!(s.grouping_separator, '.');
        assert_eq!(s.db_path(), PathBuf::from("/tmp/test/monstera.db"));
    }

    #[test]
    fn test_shellexpand_keeps_plain_paths() {
        assert_eq!(shellexpand_path("/no/such/dir"), "/no/such/dir");
    }
}
