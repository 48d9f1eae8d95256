//! Startup: credential lookup, credential collection and vendor login.

use std::io::Write;

use crate::api::vendor::VendorApi;
use crate::auth::keychain::{SecretKey, SecretStore};
use crate::cli::output::{Outcome, RenderContext};
use crate::cli::prompt::{ask_yes_no, Prompter};
use crate::error::AppError;
use crate::l10n::Message;
use crate::settings::{SettingKey, SettingsStore};

#[derive(Debug, Default)]
struct Credentials {
    app_id: Option<String>,
    app_secret: Option<String>,
}

impl Credentials {
    fn slot(&mut self, key: SecretKey) -> Option<&mut Option<String>> {
        match key {
            SecretKey::AppId => Some(&mut self.app_id),
            SecretKey::AppSecret => Some(&mut self.app_secret),
            SecretKey::UserToken => None,
        }
    }
}

pub fn keychain_check(secrets: &dyn SecretStore, key: SecretKey, missing: &str) -> Outcome<String> {
    match secrets.get(key) {
        Ok(Some(value)) => Outcome::Success(value),
        Ok(None) => Outcome::Failure(missing.to_string()),
        Err(e) => Outcome::Failure(e.to_string()),
    }
}

pub fn settings_check(settings: &dyn SettingsStore, key: SettingKey, missing: &str) -> Outcome<String> {
    match settings.get(key) {
        Ok(Some(value)) => Outcome::Success(value),
        Ok(None) => Outcome::Warning(missing.to_string()),
        Err(e) => Outcome::Warning(e.to_string()),
    }
}

fn fatal<W: Write>(ctx: &RenderContext<W>, message: Message) -> AppError {
    AppError::Fatal(ctx.text(message).to_string())
}

/// Input closing before bootstrap finishes leaves the shell unusable.
fn closed_as_fatal(err: AppError, message: &str) -> AppError {
    match err {
        AppError::InputClosed => AppError::Fatal(message.to_string()),
        other => other,
    }
}

/// Bring the client to an authenticated state.
///
/// Returns `Err(AppError::Fatal(_))` when the shell must not start.
pub async fn run<W: Write>(
    ctx: &mut RenderContext<W>,
    prompter: &mut dyn Prompter,
    secrets: &dyn SecretStore,
    settings: &dyn SettingsStore,
    api: &mut dyn VendorApi,
) -> Result<(), AppError> {
    ctx.message(Message::Welcome)?;
    ctx.space()?;

    ctx.message(Message::CheckingKeychain)?;
    let mut credentials = Credentials::default();
    for key in SecretKey::REQUIRED {
        ctx.operation(key.as_str())?;
        let outcome = keychain_check(secrets, key, ctx.text(Message::KeychainEntityNotFound));
        ctx.outcome(&outcome)?;
        if let (Outcome::Success(value), Some(slot)) = (outcome, credentials.slot(key)) {
            *slot = Some(value);
        }
    }

    ctx.message(Message::CheckingSettings)?;
    for key in SettingKey::ALL {
        ctx.operation(key.as_str())?;
        let outcome = settings_check(settings, key, ctx.text(Message::SettingNotFound));
        ctx.outcome(&outcome)?;
    }

    ctx.space()?;
    let missing = ctx.text(Message::NecessaryTokensNotFound);
    fulfill_credentials(ctx, prompter, secrets, &mut credentials)
        .map_err(|e| closed_as_fatal(e, missing))?;

    let (Some(app_id), Some(app_secret)) = (credentials.app_id, credentials.app_secret) else {
        return Err(fatal(ctx, Message::NecessaryTokensNotFound));
    };

    ctx.operation(ctx.text(Message::InitializingClient))?;
    let has_user_token = match api.initialize(&app_id, &app_secret).await {
        Ok(has_user_token) => {
            ctx.outcome(&Outcome::Success(()))?;
            has_user_token
        }
        Err(e) => {
            ctx.outcome(&Outcome::<()>::Failure(e.to_string()))?;
            return Err(AppError::Fatal(e.to_string()));
        }
    };

    ctx.operation(ctx.text(Message::CheckingAuthToken))?;
    if has_user_token {
        match api.resume_session().await {
            Ok(()) => {
                ctx.outcome(&Outcome::Success(()))?;
                tracing::info!("resumed stored session");
                return Ok(());
            }
            Err(e) => ctx.outcome(&Outcome::<()>::Failure(e.to_string()))?,
        }
    } else {
        let warning = ctx.text(Message::AuthTokenNotFound).to_string();
        ctx.outcome(&Outcome::<()>::Warning(warning))?;
    }

    let declined = ctx.text(Message::AuthDeclined);
    authorize(ctx, prompter, api)
        .await
        .map_err(|e| closed_as_fatal(e, declined))
}

/// Prompt for every required credential that the keychain did not have and
/// write non-empty answers back.
fn fulfill_credentials<W: Write>(
    ctx: &mut RenderContext<W>,
    prompter: &mut dyn Prompter,
    secrets: &dyn SecretStore,
    credentials: &mut Credentials,
) -> Result<(), AppError> {
    for key in SecretKey::REQUIRED {
        let Some(slot) = credentials.slot(key) else {
            continue;
        };
        if slot.is_some() {
            continue;
        }

        ctx.line(&format!("{}: {}", ctx.text(Message::NecessaryTokenNotFound), key))?;
        let value = prompter.read_secret(ctx.text(Message::ValuePrompt))?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        ctx.operation(ctx.text(Message::Writing))?;
        let outcome = match secrets.set(key, value) {
            Ok(()) => Outcome::Success(()),
            Err(e) => Outcome::Failure(e.to_string()),
        };
        ctx.outcome(&outcome)?;
        *slot = Some(value.to_string());
    }
    Ok(())
}

/// Interactive login, including the single SMS-code round.
async fn authorize<W: Write>(
    ctx: &mut RenderContext<W>,
    prompter: &mut dyn Prompter,
    api: &mut dyn VendorApi,
) -> Result<(), AppError> {
    if !ask_yes_no(ctx, prompter, Message::AuthPrompt)? {
        return Err(fatal(ctx, Message::AuthDeclined));
    }

    let login = prompter.read_line(ctx.text(Message::LoginPrompt))?;
    let login = login.trim();
    let password = prompter.read_secret(ctx.text(Message::PasswordPrompt))?;

    ctx.operation(ctx.text(Message::Authorizing))?;
    match api.authenticate(login, &password, None).await {
        Ok(()) => {
            ctx.outcome(&Outcome::Success(()))?;
            tracing::info!("authorized");
            Ok(())
        }
        Err(AppError::SecondFactorRequired { phone }) => {
            let required = ctx.text(Message::SmsCodeRequired);
            let detail = match phone {
                Some(phone) => format!("{} ({})", required, phone),
                None => required.to_string(),
            };
            ctx.outcome(&Outcome::<()>::Warning(detail))?;

            let code = prompter.read_line(ctx.text(Message::SmsCodePrompt))?;
            ctx.operation(ctx.text(Message::Authorizing))?;
            let outcome = match api.authenticate(login, &password, Some(code.trim())).await {
                Ok(()) => Outcome::Success(()),
                Err(e) => Outcome::Failure(e.to_string()),
            };
            ctx.outcome(&outcome)?;
            tracing::info!(authorized = outcome.is_success(), "second factor round finished");
            Ok(())
        }
        Err(e) => {
            ctx.outcome(&Outcome::<()>::Failure(e.to_string()))?;
            Err(fatal(ctx, Message::AuthFailed))
        }
    }
}
