use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AppError;

/// Plain (unencrypted) user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    DeviceId,
}

impl SettingKey {
    pub const ALL: [SettingKey; 1] = [SettingKey::DeviceId];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::DeviceId => "DEVICE_ID",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown setting key '{}'", wanted)))
    }
}

pub trait SettingsStore {
    fn get(&self, key: SettingKey) -> Result<Option<String>, AppError>;
    fn set(&mut self, key: SettingKey, value: &str) -> Result<(), AppError>;
}

/// Settings persisted as a flat JSON object.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Settings(format!("{} is not valid: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, body)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: SettingKey) -> Result<Option<String>, AppError> {
        Ok(self.load()?.remove(key.as_str()))
    }

    fn set(&mut self, key: SettingKey, value: &str) -> Result<(), AppError> {
        let mut values = self.load()?;
        values.insert(key.as_str().to_string(), value.to_string());
        self.save(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_key_parse() {
        assert_eq!("DEVICE_ID".parse::<SettingKey>().unwrap(), SettingKey::DeviceId);
        assert_eq!(" device_id ".parse::<SettingKey>().unwrap(), SettingKey::DeviceId);
        assert!("COLOR".parse::<SettingKey>().is_err());
        assert!("".parse::<SettingKey>().is_err());
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::new(dir.path().join("settings.json"));
        assert_eq!(settings.get(SettingKey::DeviceId).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = FileSettings::new(&path);

        settings.set(SettingKey::DeviceId, "864326067148561").unwrap();

        assert!(path.exists());
        assert_eq!(
            settings.get(SettingKey::DeviceId).unwrap().as_deref(),
            Some("864326067148561")
        );

        let reopened = FileSettings::new(&path);
        assert_eq!(
            reopened.get(SettingKey::DeviceId).unwrap().as_deref(),
            Some("864326067148561")
        );
    }

    #[test]
    fn test_overwrite_keeps_single_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = FileSettings::new(dir.path().join("settings.json"));
        settings.set(SettingKey::DeviceId, "1").unwrap();
        settings.set(SettingKey::DeviceId, "2").unwrap();
        assert_eq!(settings.get(SettingKey::DeviceId).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        let settings = FileSettings::new(&path);
        assert!(matches!(
            settings.get(SettingKey::DeviceId),
            Err(AppError::Settings(_))
        ));
    }
}
