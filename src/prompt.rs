//! Interactive questions asked by `voxa init`.

use std::io::{self, BufRead, Write};

use crate::config::DEFAULT_BASE_URL;

/// Everything `init` collects from the user. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitAnswers {
    pub base_url: Option<String>,
    pub header: Option<String>,
    pub api_key: Option<String>,
}

/// Source of [`InitAnswers`].
pub trait Prompter {
    fn init_answers(&mut self) -> io::Result<InitAnswers>;
}

/// Asks the questions on a line-oriented terminal.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_with_default(&mut self, question: &str, default: &str) -> io::Result<String> {
        let answer = self.ask(&format!("{question} ({default})"))?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    /// Yes/no question that defaults to "no".
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} (y/N)"))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn optional(&mut self, question: &str) -> io::Result<Option<String>> {
        let answer = self.ask(question)?;
        Ok(Some(answer).filter(|a| !a.is_empty()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn init_answers(&mut self) -> io::Result<InitAnswers> {
        let base_url = self.ask_with_default("Enter the base URL:", DEFAULT_BASE_URL)?;

        let header = if self.confirm("Do you want to add custom headers?")? {
            self.optional("Enter a custom header (key:value):")?
        } else {
            None
        };

        let api_key = if self.confirm("Do you want to add an API Key?")? {
            self.optional("Enter an API Key:")?
        } else {
            None
        };

        Ok(InitAnswers {
            base_url: Some(base_url),
            header,
            api_key,
        })
    }
}
