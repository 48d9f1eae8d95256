use std::path::PathBuf;

use crate::l10n::Locale;

const SETTINGS_DIR: &str = "cassiopeia";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub verbose: bool,
    pub locale: Locale,
    pub color: bool,
    pub settings_path: PathBuf,
}

/// Default settings location: `<config dir>/cassiopeia/settings.json`,
/// or the working directory when the platform has no config dir.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "cassiopeia=debug,warn"
    } else {
        "warn"
    }
}
