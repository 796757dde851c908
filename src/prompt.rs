//! Yes/no confirmation for optional groups.
use std::io::{BufRead as _, Write as _};

use anyhow::{Context as _, Result};

use crate::logging::Log;

/// Source of interactive answers.
pub trait Prompt: Send + Sync + std::fmt::Debug {
    /// Show `question` and read one line of input.
    ///
    /// Returns `None` when input is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be written or read.
    fn ask(&self, question: &str) -> Result<Option<String>>;
}

/// [`Prompt`] backed by the process's stdin and stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    #[allow(clippy::print_stdout)]
    fn ask(&self, question: &str) -> Result<Option<String>> {
        print!("{question} [y/N] ");
        std::io::stdout().flush().context("flush prompt")?;
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read answer")?;
        Ok((read > 0).then_some(line))
    }
}

/// How a confirmation is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// `--yes`: accept without asking.
    AssumeYes,
    /// `--dry-run`: decline without asking, logging the question.
    Preview,
    /// Ask on the terminal.
    Interactive,
}

impl ConfirmMode {
    /// Pick the mode for the given flags. `--yes` wins over `--dry-run`.
    #[must_use]
    pub const fn from_flags(assume_yes: bool, dry_run: bool) -> Self {
        if assume_yes {
            Self::AssumeYes
        } else if dry_run {
            Self::Preview
        } else {
            Self::Interactive
        }
    }
}

/// `y` or `yes` in any case accepts; anything else, including no input,
/// declines.
#[must_use]
pub fn parse_answer(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| {
        let a = a.trim();
        a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
    })
}

/// Resolve a yes/no `question` according to `mode`.
///
/// # Errors
///
/// Returns an error if the interactive prompt fails.
pub fn confirm(
    mode: ConfirmMode,
    prompt: &dyn Prompt,
    log: &dyn Log,
    question: &str,
) -> Result<bool> {
    match mode {
        ConfirmMode::AssumeYes => {
            log.debug(&format!("{question} yes (--yes)"));
            Ok(true)
        }
        ConfirmMode::Preview => {
            log.dry_run(&format!("would ask: {question} (declined in dry run)"));
            Ok(false)
        }
        ConfirmMode::Interactive => {
            let answer = prompt.ask(question)?;
            let accepted = parse_answer(answer.as_deref());
            log.debug(&format!(
                "{question} {}",
                if accepted { "yes" } else { "no" }
            ));
            Ok(accepted)
        }
    }
}
