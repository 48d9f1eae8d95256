use keyring::Entry;

use crate::error::AppError;

const SERVICE: &str = "cassiopeia";

/// Names of the secrets kept in the OS keychain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKey {
    AppId,
    AppSecret,
    UserToken,
}

impl SecretKey {
    /// Secrets without which the shell cannot start.
    pub const REQUIRED: [SecretKey; 2] = [SecretKey::AppId, SecretKey::AppSecret];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecretKey::AppId => "APP_ID",
            SecretKey::AppSecret => "APP_SECRET",
            SecretKey::UserToken => "USER_TOKEN",
        }
    }
}

impl std::fmt::Display for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait SecretStore: Send + Sync {
    /// Returns `Ok(None)` when the entry does not exist.
    fn get(&self, key: SecretKey) -> Result<Option<String>, AppError>;
    fn set(&self, key: SecretKey, value: &str) -> Result<(), AppError>;
    fn delete(&self, key: SecretKey) -> Result<(), AppError>;
}

/// Secret store backed by the platform keychain.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE)
    }

    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: SecretKey) -> Result<Entry, AppError> {
        Entry::new(&self.service, key.as_str()).map_err(|e| AppError::Keychain(e.to_string()))
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeychainStore {
    fn get(&self, key: SecretKey) -> Result<Option<String>, AppError> {
        let entry = self.entry(key)?;
        match entry.get_password() {
            Ok(val) => Ok(Some(val)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::Keychain(e.to_string())),
        }
    }

    fn set(&self, key: SecretKey, value: &str) -> Result<(), AppError> {
        let entry = self.entry(key)?;
        entry
            .set_password(value)
            .map_err(|e| AppError::Keychain(e.to_string()))
    }

    fn delete(&self, key: SecretKey) -> Result<(), AppError> {
        let entry = self.entry(key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::Keychain(e.to_string())),
        }
    }
}
