//! The interactive command loop.

use std::io::Write;

use crate::api::vendor::{RemoteCommand, VendorApi};
use crate::cli::output::{Outcome, RenderContext};
use crate::cli::prompt::Prompter;
use crate::error::AppError;
use crate::l10n::Message;
use crate::models::descriptive::DescriptiveDevice;
use crate::models::device::Device;
use crate::settings::{SettingKey, SettingsStore};

const INPUT_PROMPT: &str = "cassiopeia";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AllCars,
    Set,
    Help,
    Exit,
    Status,
    Remote(RemoteCommand),
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::AllCars,
        Command::Set,
        Command::Help,
        Command::Exit,
        Command::Status,
        Command::Remote(RemoteCommand::Arm),
        Command::Remote(RemoteCommand::Disarm),
        Command::Remote(RemoteCommand::Start),
        Command::Remote(RemoteCommand::Stop),
        Command::Remote(RemoteCommand::Honk),
    ];

    pub fn literal(&self) -> &'static str {
        match self {
            Command::AllCars => "allcars",
            Command::Set => "set",
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Status => "status",
            Command::Remote(RemoteCommand::Arm) => "!arm",
            Command::Remote(RemoteCommand::Disarm) => "!disarm",
            Command::Remote(RemoteCommand::Start) => "!start",
            Command::Remote(RemoteCommand::Stop) => "!stop",
            Command::Remote(RemoteCommand::Honk) => "!honk",
        }
    }

    /// Exact match against the command literals.
    pub fn parse(input: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.literal() == input)
    }

    fn description(&self) -> Message {
        match self {
            Command::AllCars => Message::HelpAllcars,
            Command::Set => Message::HelpSet,
            Command::Help => Message::HelpHelp,
            Command::Exit => Message::HelpExit,
            Command::Status => Message::HelpStatus,
            Command::Remote(RemoteCommand::Arm) => Message::HelpArm,
            Command::Remote(RemoteCommand::Disarm) => Message::HelpDisarm,
            Command::Remote(RemoteCommand::Start) => Message::HelpStart,
            Command::Remote(RemoteCommand::Stop) => Message::HelpStop,
            Command::Remote(RemoteCommand::Honk) => Message::HelpHonk,
        }
    }
}

fn remote_title(command: RemoteCommand) -> Message {
    match command {
        RemoteCommand::Arm => Message::Arming,
        RemoteCommand::Disarm => Message::Disarming,
        RemoteCommand::Start => Message::StartingEngine,
        RemoteCommand::Stop => Message::StoppingEngine,
        RemoteCommand::Honk => Message::Honking,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, W: Write> {
    ctx: &'a mut RenderContext<W>,
    prompter: &'a mut dyn Prompter,
    settings: &'a mut dyn SettingsStore,
    api: &'a dyn VendorApi,
}

impl<'a, W: Write> Shell<'a, W> {
    pub fn new(
        ctx: &'a mut RenderContext<W>,
        prompter: &'a mut dyn Prompter,
        settings: &'a mut dyn SettingsStore,
        api: &'a dyn VendorApi,
    ) -> Self {
        Self {
            ctx,
            prompter,
            settings,
            api,
        }
    }

    /// Read and execute commands until `exit` or end of input.
    pub async fn run(&mut self) -> Result<(), AppError> {
        self.ctx.space()?;
        self.ctx.message(Message::ReadyForInput)?;

        loop {
            let input = match self.prompter.read_line(INPUT_PROMPT) {
                Ok(input) => input,
                Err(AppError::InputClosed) => {
                    tracing::debug!("input closed, leaving the shell");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            if self.execute(&input).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Execute one line of input.
    pub async fn execute(&mut self, input: &str) -> Result<Flow, AppError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(command) = Command::parse(input) else {
            self.ctx.operation(self.ctx.text(Message::ParsingCommand))?;
            let failure = format!("{}: {}", self.ctx.text(Message::UnknownCommand), input);
            self.ctx.outcome(&Outcome::<()>::Failure(failure))?;
            return Ok(Flow::Continue);
        };

        tracing::debug!(command = command.literal(), "dispatching");
        match command {
            Command::AllCars => self.all_cars().await?,
            Command::Set => self.set()?,
            Command::Help => self.help()?,
            Command::Exit => {
                self.ctx.operation(self.ctx.text(Message::Exiting))?;
                self.ctx.outcome(&Outcome::Success(()))?;
                return Ok(Flow::Exit);
            }
            Command::Status => self.status().await?,
            Command::Remote(remote) => self.remote(remote).await?,
        }
        Ok(Flow::Continue)
    }

    fn failure_text(&self, err: &AppError) -> String {
        tracing::debug!(
            error_type = err.error_type(),
            error_code = ?err.api_error_code(),
            error = %err,
            "operation failed"
        );
        match err {
            AppError::MalformedPayload(_) => self.ctx.text(Message::CorruptedData).to_string(),
            other => other.to_string(),
        }
    }

    fn device_id(&self) -> Result<String, String> {
        let key = SettingKey::DeviceId;
        match self.settings.get(key) {
            Ok(Some(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            Ok(_) => Err(format!("{}: {}", self.ctx.text(Message::SettingNotFound), key)),
            Err(e) => Err(self.failure_text(&e)),
        }
    }

    async fn fetch_devices(&self) -> Outcome<Vec<Device>> {
        match self.api.list_devices().await {
            Ok(devices) if devices.is_empty() => {
                Outcome::Warning(self.ctx.text(Message::NoDevicesFound).to_string())
            }
            Ok(devices) => Outcome::Success(devices),
            Err(e) => Outcome::Failure(self.failure_text(&e)),
        }
    }

    async fn fetch_status(&self) -> Outcome<DescriptiveDevice> {
        let device_id = match self.device_id() {
            Ok(id) => id,
            Err(message) => return Outcome::Failure(message),
        };
        match self.api.get_device(&device_id).await {
            Ok(device) => Outcome::Success(device.descriptive()),
            Err(e) => Outcome::Failure(self.failure_text(&e)),
        }
    }

    async fn send(&self, command: RemoteCommand) -> Outcome<()> {
        let device_id = match self.device_id() {
            Ok(id) => id,
            Err(message) => return Outcome::Failure(message),
        };
        match self.api.run_command(command, &device_id).await {
            Ok(()) => Outcome::Success(()),
            Err(e) => Outcome::Failure(self.failure_text(&e)),
        }
    }

    async fn all_cars(&mut self) -> Result<(), AppError> {
        self.ctx.operation(self.ctx.text(Message::FetchingDevices))?;
        let outcome = self.fetch_devices().await;
        self.ctx.outcome(&outcome)?;
        if let Outcome::Success(devices) = outcome {
            self.ctx.nested(|ctx| {
                devices
                    .iter()
                    .try_for_each(|d| ctx.line(&format!("{} ({})", d.alias_or_id(), d.id)))
            })?;
        }
        Ok(())
    }

    async fn status(&mut self) -> Result<(), AppError> {
        self.ctx.operation(self.ctx.text(Message::FetchingStatus))?;
        let outcome = self.fetch_status().await;
        self.ctx.outcome(&outcome)?;
        if let Outcome::Success(device) = outcome {
            let fields = device.fields(self.ctx.locale);
            self.ctx.nested(|ctx| {
                fields
                    .iter()
                    .try_for_each(|(field, value)| ctx.line(&format!("{}: {}", ctx.text(*field), value)))
            })?;
        }
        Ok(())
    }

    async fn remote(&mut self, command: RemoteCommand) -> Result<(), AppError> {
        self.ctx.operation(self.ctx.text(remote_title(command)))?;
        let outcome = self.send(command).await;
        self.ctx.outcome(&outcome)?;
        Ok(())
    }

    fn set(&mut self) -> Result<(), AppError> {
        self.ctx.message(Message::AvailableSettings)?;
        self.ctx.nested(|ctx| {
            SettingKey::ALL
                .iter()
                .try_for_each(|key| ctx.line(key.as_str()))
        })?;

        let raw_key = self.prompter.read_line(self.ctx.text(Message::SettingKeyPrompt))?;
        let value = self.prompter.read_line(self.ctx.text(Message::SettingValuePrompt))?;
        let value = value.trim();

        self.ctx.operation(self.ctx.text(Message::Writing))?;
        let outcome = match raw_key.parse::<SettingKey>() {
            Err(_) => Outcome::Failure(format!(
                "{}: {}",
                self.ctx.text(Message::UnknownSettingKey),
                raw_key.trim()
            )),
            Ok(_) if value.is_empty() => {
                Outcome::Failure(self.ctx.text(Message::EmptyValue).to_string())
            }
            Ok(key) => match self.settings.set(key, value) {
                Ok(()) => Outcome::Success(key),
                Err(e) => Outcome::Failure(self.failure_text(&e)),
            },
        };
        self.ctx.outcome(&outcome)?;
        Ok(())
    }

    fn help(&mut self) -> Result<(), AppError> {
        self.ctx.operation(self.ctx.text(Message::Help))?;
        self.ctx.outcome(&Outcome::Success(()))?;
        self.ctx.nested(|ctx| {
            ctx.line(&format!("Cassiopeia {}", env!("CARGO_PKG_VERSION")))?;
            Command::ALL.iter().try_for_each(|command| {
                ctx.line(&format!(
                    "{:<10}{}",
                    command.literal(),
                    ctx.text(command.description())
                ))
            })
        })?;
        Ok(())
    }
}
