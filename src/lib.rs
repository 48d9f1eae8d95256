pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod l10n;
pub mod models;
pub mod settings;

#[cfg(test)]
mod testing;

use std::env;
use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

use api::client::{Endpoints, StarlineClient};
use auth::keychain::KeychainStore;
use cli::bootstrap;
use cli::output::RenderContext;
use cli::prompt::TerminalPrompter;
use cli::shell::Shell;
use config::{default_log_filter, default_settings_path, RuntimeConfig};
use error::AppError;
use l10n::Locale;
use settings::FileSettings;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn color_enabled(no_color_flag: bool) -> bool {
    let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    !no_color_flag && !no_color_env && io::stdout().is_terminal()
}

pub async fn run(cli_args: cli::Cli) -> i32 {
    let config = RuntimeConfig {
        verbose: cli_args.verbose,
        locale: cli_args.lang.unwrap_or_else(Locale::detect),
        color: color_enabled(cli_args.no_color),
        settings_path: cli_args.settings.unwrap_or_else(default_settings_path),
    };
    init_tracing(config.verbose);
    tracing::debug!(?config, "starting");

    let mut ctx = RenderContext::stdout(config.locale, config.color);
    let result = session(&mut ctx, &config).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(error_type = err.error_type(), "session ended with error");
            let code = err.exit_code();
            if code != 0 {
                let _ = ctx.fatal(&err.to_string());
            }
            code
        }
    }
}

async fn session(
    ctx: &mut RenderContext<io::Stdout>,
    config: &RuntimeConfig,
) -> Result<(), AppError> {
    let secrets = KeychainStore::new();
    let mut settings = FileSettings::new(config.settings_path.clone());
    tracing::debug!(path = %settings.path().display(), "settings file");
    let mut api = StarlineClient::new(Endpoints::default(), Box::new(KeychainStore::new()))?;
    let mut prompter = TerminalPrompter::new();

    bootstrap::run(ctx, &mut prompter, &secrets, &settings, &mut api).await?;
    tracing::debug!(session = api.has_session(), "bootstrap finished");

    Shell::new(ctx, &mut prompter, &mut settings, &api).run().await
}
