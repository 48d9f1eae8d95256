use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::{Input, Password};

use crate::cli::output::RenderContext;
use crate::error::AppError;
use crate::l10n::Message;

/// Line input from the user.
pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, AppError>;

    /// Like [`Prompter::read_line`] but without echoing what is typed.
    fn read_secret(&mut self, prompt: &str) -> Result<String, AppError>;
}

/// Reads from the controlling terminal through `dialoguer`, or from plain
/// stdin when input is piped.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_piped(prompt: &str) -> Result<String, AppError> {
        let mut stdout = io::stdout();
        write!(stdout, "{}: ", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn map_dialoguer(err: dialoguer::Error) -> AppError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::UnexpectedEof => AppError::InputClosed,
        dialoguer::Error::IO(e) => AppError::Io(e),
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, AppError> {
        if !io::stdin().is_terminal() {
            return Self::read_piped(prompt);
        }
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(map_dialoguer)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String, AppError> {
        if !io::stdin().is_terminal() {
            return Self::read_piped(prompt);
        }
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(map_dialoguer)
    }
}

/// Ask a yes/no question until the answer is one of the yes/no words of any
/// supported language.
pub fn ask_yes_no<W: Write>(
    ctx: &mut RenderContext<W>,
    prompter: &mut dyn Prompter,
    question: Message,
) -> Result<bool, AppError> {
    let prompt = format!(
        "{} ({}/{})",
        ctx.text(question),
        ctx.text(Message::Yes),
        ctx.text(Message::No)
    );
    loop {
        let answer = prompter.read_line(&prompt)?;
        match parse_yes_no(&answer) {
            Some(decision) => return Ok(decision),
            None => ctx.message(Message::ExplicitResponse)?,
        }
    }
}

pub fn parse_yes_no(answer: &str) -> Option<bool> {
    let answer = answer.trim().to_lowercase();
    if Message::Yes.every().iter().any(|w| *w == answer) {
        Some(true)
    } else if Message::No.every().iter().any(|w| *w == answer) {
        Some(false)
    } else {
        None
    }
}
