use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::models::device::Device;

/// Remote commands the shell can send to a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    Arm,
    Disarm,
    Start,
    Stop,
    Honk,
}

impl RemoteCommand {
    /// Parameter name understood by the `set_param` endpoint.
    pub fn param_type(&self) -> &'static str {
        match self {
            RemoteCommand::Arm | RemoteCommand::Disarm => "arm",
            RemoteCommand::Start | RemoteCommand::Stop => "ign",
            RemoteCommand::Honk => "poke",
        }
    }

    pub fn param_value(&self) -> i32 {
        match self {
            RemoteCommand::Arm | RemoteCommand::Start | RemoteCommand::Honk => 1,
            RemoteCommand::Disarm | RemoteCommand::Stop => 0,
        }
    }

    pub fn to_body(&self) -> Value {
        let mut body = json!({ "type": self.param_type() });
        body[self.param_type()] = json!(self.param_value());
        body
    }
}

/// The seam between the shell and the telematics vendor.
#[async_trait]
pub trait VendorApi: Send + Sync {
    /// Register the application; returns whether a user token from an earlier
    /// session is available for silent authentication.
    async fn initialize(&mut self, app_id: &str, app_secret: &str) -> Result<bool, AppError>;

    /// Open a session with the stored user token.
    async fn resume_session(&mut self) -> Result<(), AppError>;

    /// Log in with user credentials. Fails with
    /// [`AppError::SecondFactorRequired`] when the account wants an SMS code.
    async fn authenticate(
        &mut self,
        login: &str,
        password: &str,
        sms_code: Option<&str>,
    ) -> Result<(), AppError>;

    async fn list_devices(&self) -> Result<Vec<Device>, AppError>;

    async fn get_device(&self, device_id: &str) -> Result<Device, AppError>;

    async fn run_command(&self, command: RemoteCommand, device_id: &str) -> Result<(), AppError>;
}
