//! In-memory doubles for the external collaborators, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::vendor::{RemoteCommand, VendorApi};
use crate::auth::keychain::{SecretKey, SecretStore};
use crate::cli::prompt::Prompter;
use crate::error::AppError;
use crate::models::device::Device;
use crate::settings::{SettingKey, SettingsStore};

/// Answers prompts from a fixed script; runs out as closed input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub secret_prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    fn next(&mut self) -> Result<String, AppError> {
        self.answers.pop_front().ok_or(AppError::InputClosed)
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, AppError> {
        self.prompts.push(prompt.to_string());
        self.next()
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String, AppError> {
        self.prompts.push(prompt.to_string());
        self.secret_prompts.push(prompt.to_string());
        self.next()
    }
}

#[derive(Debug, Default)]
pub struct MemorySecrets {
    values: Mutex<HashMap<SecretKey, String>>,
    pub writes: Mutex<Vec<SecretKey>>,
}

impl MemorySecrets {
    pub fn with(entries: &[(SecretKey, &str)]) -> Self {
        let store = Self::default();
        for (key, value) in entries {
            store
                .values
                .lock()
                .unwrap()
                .insert(*key, value.to_string());
        }
        store
    }

    pub fn value(&self, key: SecretKey) -> Option<String> {
        self.values.lock().unwrap().get(&key).cloned()
    }
}

impl SecretStore for MemorySecrets {
    fn get(&self, key: SecretKey) -> Result<Option<String>, AppError> {
        Ok(self.value(key))
    }

    fn set(&self, key: SecretKey, value: &str) -> Result<(), AppError> {
        self.writes.lock().unwrap().push(key);
        self.values
            .lock()
            .unwrap()
            .insert(key, value.to_string());
        Ok(())
    }

    fn delete(&self, key: SecretKey) -> Result<(), AppError> {
        self.values.lock().unwrap().remove(&key);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySettings {
    pub values: HashMap<SettingKey, String>,
}

impl MemorySettings {
    pub fn with(entries: &[(SettingKey, &str)]) -> Self {
        Self {
            values: entries
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect(),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: SettingKey) -> Result<Option<String>, AppError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: SettingKey, value: &str) -> Result<(), AppError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }
}

/// How [`FakeApi::authenticate`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScript {
    #[default]
    Accept,
    Reject,
    /// Ask for an SMS code, then accept it.
    SmsThenAccept,
    /// Ask for an SMS code, then reject it.
    SmsThenReject,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    pub fail_initialize: bool,
    pub stored_token: bool,
    pub resume_ok: bool,
    pub auth: AuthScript,
    pub devices: Vec<Device>,
    pub device: Option<Device>,
    pub malformed_device: bool,
    pub fail_commands: bool,
    pub authenticated: bool,
    pub auth_calls: Mutex<Vec<Option<String>>>,
    pub commands: Mutex<Vec<(RemoteCommand, String)>>,
}

#[async_trait]
impl VendorApi for FakeApi {
    async fn initialize(&mut self, _app_id: &str, _app_secret: &str) -> Result<bool, AppError> {
        if self.fail_initialize {
            return Err(AppError::Auth {
                message: "bad application secret".into(),
                error_code: Some(0),
            });
        }
        Ok(self.stored_token)
    }

    async fn resume_session(&mut self) -> Result<(), AppError> {
        if self.resume_ok {
            self.authenticated = true;
            Ok(())
        } else {
            Err(AppError::Auth {
                message: "token expired".into(),
                error_code: None,
            })
        }
    }

    async fn authenticate(
        &mut self,
        _login: &str,
        _password: &str,
        sms_code: Option<&str>,
    ) -> Result<(), AppError> {
        self.auth_calls
            .lock()
            .unwrap()
            .push(sms_code.map(|s| s.to_string()));
        let accept = match (self.auth, sms_code) {
            (AuthScript::Accept, _) => true,
            (AuthScript::Reject, _) => false,
            (AuthScript::SmsThenAccept | AuthScript::SmsThenReject, None) => {
                return Err(AppError::SecondFactorRequired {
                    phone: Some("+7*******12".into()),
                })
            }
            (AuthScript::SmsThenAccept, Some(_)) => true,
            (AuthScript::SmsThenReject, Some(_)) => false,
        };
        if accept {
            self.authenticated = true;
            Ok(())
        } else {
            Err(AppError::Auth {
                message: "Wrong login or password".into(),
                error_code: Some(0),
            })
        }
    }

    async fn list_devices(&self) -> Result<Vec<Device>, AppError> {
        if !self.authenticated {
            return Err(AppError::NotAuthenticated);
        }
        Ok(self.devices.clone())
    }

    async fn get_device(&self, device_id: &str) -> Result<Device, AppError> {
        if self.malformed_device {
            return Err(AppError::MalformedPayload("reply has no device data".into()));
        }
        self.device
            .clone()
            .filter(|d| d.id.to_string() == device_id)
            .ok_or_else(|| AppError::Api {
                message: "Device not found".into(),
                error_code: Some(404),
            })
    }

    async fn run_command(&self, command: RemoteCommand, device_id: &str) -> Result<(), AppError> {
        if self.fail_commands {
            return Err(AppError::Api {
                message: "Device is offline".into(),
                error_code: Some(500),
            });
        }
        self.commands
            .lock()
            .unwrap()
            .push((command, device_id.to_string()));
        Ok(())
    }
}
