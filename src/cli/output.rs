use std::io::{self, Write};

use colored::Colorize;

use crate::l10n::{Locale, Message};

const INDENT: &str = "    ";

/// Result of one user-visible operation, carrying its own payload type.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Warning(String),
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tint {
    Green,
    Yellow,
    Red,
}

/// Everything an output call needs: where to write, in which language,
/// at which indentation and whether to emit ANSI colors.
pub struct RenderContext<W: Write> {
    out: W,
    pub locale: Locale,
    pub color: bool,
    indent: usize,
}

impl RenderContext<io::Stdout> {
    pub fn stdout(locale: Locale, color: bool) -> Self {
        Self::new(io::stdout(), locale, color)
    }
}

impl<W: Write> RenderContext<W> {
    pub fn new(out: W, locale: Locale, color: bool) -> Self {
        Self {
            out,
            locale,
            color,
            indent: 0,
        }
    }

    pub fn text(&self, message: Message) -> &'static str {
        message.text(self.locale)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn pad(&self, extra: usize) -> String {
        INDENT.repeat(self.indent + extra)
    }

    fn paint(&self, s: &str, tint: Tint) -> String {
        if !self.color {
            return s.to_string();
        }
        match tint {
            Tint::Green => s.green().to_string(),
            Tint::Yellow => s.yellow().to_string(),
            Tint::Red => s.red().to_string(),
        }
    }

    fn write_line(&mut self, s: &str) -> io::Result<()> {
        writeln!(self.out, "{}", s)?;
        self.out.flush()
    }

    pub fn line(&mut self, s: &str) -> io::Result<()> {
        let padded = format!("{}{}", self.pad(0), s);
        self.write_line(&padded)
    }

    pub fn message(&mut self, message: Message) -> io::Result<()> {
        self.line(message.text(self.locale))
    }

    pub fn space(&mut self) -> io::Result<()> {
        self.write_line("")
    }

    /// Start an operation line: `title... ` with no newline, awaiting its result.
    pub fn operation(&mut self, title: &str) -> io::Result<()> {
        write!(self.out, "{}{}... ", self.pad(0), title)?;
        self.out.flush()
    }

    /// Finish an operation line with its status label and optional detail line.
    pub fn outcome<T>(&mut self, outcome: &Outcome<T>) -> io::Result<()> {
        let (label, tint, detail) = match outcome {
            Outcome::Success(_) => (Message::SuccessLabel, Tint::Green, None),
            Outcome::Warning(m) => (Message::WarningLabel, Tint::Yellow, Some(m)),
            Outcome::Failure(m) => (Message::FailureLabel, Tint::Red, Some(m)),
        };
        let painted = self.paint(label.text(self.locale), tint);
        self.write_line(&painted)?;
        if let Some(detail) = detail {
            self.detail(detail)?;
        }
        Ok(())
    }

    pub fn detail(&mut self, detail: &str) -> io::Result<()> {
        let padded = format!("{}>>> {}", self.pad(1), detail);
        self.write_line(&padded)
    }

    pub fn fatal(&mut self, message: &str) -> io::Result<()> {
        let label = format!("{}: ", Message::FatalLabel.text(self.locale));
        let painted = self.paint(&format!("{}{}", label, message), Tint::Red);
        self.write_line(&painted)
    }

    /// Run `f` one indentation level deeper.
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }
}
