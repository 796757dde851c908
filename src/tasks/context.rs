//! Shared state handed to every task.
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result, bail};
use tempfile::TempDir;

use crate::config::Config;
use crate::config::features::Feature;
use crate::exec::{ExecResult, Executor, display_command};
use crate::logging::Log;
use crate::prompt::{ConfirmMode, Prompt, confirm};
use crate::resources::error::ResourceError;

/// Prefix of the run-scoped build directory.
const WORKDIR_PREFIX: &str = "provision-";

/// Shared context for task execution.
pub struct Context {
    /// Configuration resolved for this run.
    pub config: Arc<Config>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Whether every confirmation is answered yes.
    pub assume_yes: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Source of interactive answers.
    pub prompt: Arc<dyn Prompt>,
    /// Build directory, created on first use and removed on drop.
    workdir: Mutex<Option<TempDir>>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("assume_yes", &self.assume_yes)
            .field("executor", &self.executor)
            .field("prompt", &self.prompt)
            .field("workdir", &self.workdir)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub const fn new(
        config: Arc<Config>,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        prompt: Arc<dyn Prompt>,
        dry_run: bool,
        assume_yes: bool,
    ) -> Self {
        Self {
            config,
            log,
            dry_run,
            assume_yes,
            executor,
            prompt,
            workdir: Mutex::new(None),
        }
    }

    /// Root directory of the dotfiles tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Whether `feature` was left enabled on the command line.
    #[must_use]
    pub fn enabled(&self, feature: Feature) -> bool {
        self.config.features.is_enabled(feature)
    }

    /// Ask a yes/no question according to `--yes` / `--dry-run`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interactive prompt fails.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        confirm(
            ConfirmMode::from_flags(self.assume_yes, self.dry_run),
            self.prompt.as_ref(),
            self.log.as_ref(),
            question,
        )
    }

    /// Run a mutating command, or only log it in dry-run mode.
    ///
    /// Returns `None` when the command was previewed.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    pub fn run_or_preview(&self, program: &str, args: &[&str]) -> Result<Option<ExecResult>> {
        let line = display_command(program, args);
        if self.dry_run {
            self.log.dry_run(&line);
            return Ok(None);
        }
        self.log.debug(&format!("running: {line}"));
        let result = self.executor.run_unchecked(program, args)?;
        self.log_output(&result);
        if !result.success {
            return Err(ResourceError::ExecutionFailed {
                program: line,
                exit_code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(Some(result))
    }

    /// Like [`run_or_preview`](Self::run_or_preview), in `dir` with extra
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    pub fn run_in_or_preview(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<Option<ExecResult>> {
        let line = display_command(program, args);
        if self.dry_run {
            self.log.dry_run(&format!("{line} (in {})", dir.display()));
            return Ok(None);
        }
        self.log
            .debug(&format!("running: {line} (in {})", dir.display()));
        let result = self.executor.run_in_with_env(dir, program, args, env)?;
        self.log_output(&result);
        Ok(Some(result))
    }

    fn log_output(&self, result: &ExecResult) {
        self.log.debug(&format!("exit code: {:?}", result.code));
        for (stream, text) in [("stdout", &result.stdout), ("stderr", &result.stderr)] {
            let text = text.trim();
            if !text.is_empty() {
                self.log.debug(&format!("{stream}: {text}"));
            }
        }
    }

    /// The run-scoped build directory, created on first call.
    ///
    /// # Errors
    ///
    /// Returns an error in dry-run mode or if the directory cannot be created.
    pub fn workdir(&self) -> Result<PathBuf> {
        if self.dry_run {
            bail!("no build directory in dry-run mode");
        }
        let mut guard = self
            .workdir
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(dir) = guard.as_ref() {
            return Ok(dir.path().to_path_buf());
        }
        let dir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir()
            .context("creating build directory")?;
        self.log
            .debug(&format!("build directory: {}", dir.path().display()));
        let path = dir.path().to_path_buf();
        *guard = Some(dir);
        Ok(path)
    }

    /// Whether the build directory has been created.
    #[must_use]
    pub fn has_workdir(&self) -> bool {
        self.workdir.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}
