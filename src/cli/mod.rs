pub mod bootstrap;
pub mod output;
pub mod prompt;
pub mod shell;

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::Parser;

use crate::l10n::Locale;

#[derive(Parser)]
#[command(
    name = "cassiopeia",
    version,
    about = "Cassiopeia - interactive shell for StarLine connected cars"
)]
pub struct Cli {
    /// Verbose output (log HTTP requests and responses to stderr)
    #[arg(short, long, env = "CASSIOPEIA_VERBOSE", value_parser = FalseyValueParser::new())]
    pub verbose: bool,

    /// Interface language: en or ru (defaults to the system locale)
    #[arg(long, env = "CASSIOPEIA_LANG")]
    pub lang: Option<Locale>,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Path of the settings file
    #[arg(long, env = "CASSIOPEIA_SETTINGS")]
    pub settings: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_is_interactive() {
        let cli = Cli::try_parse_from(["cassiopeia"]).unwrap();
        assert!(!cli.no_color);
        assert!(cli.settings.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "cassiopeia",
            "-v",
            "--lang",
            "ru",
            "--no-color",
            "--settings",
            "/tmp/s.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.lang, Some(Locale::Ru));
        assert!(cli.no_color);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["cassiopeia", "--lang", "de"]).is_err());
    }
}
