// Shared helpers for integration tests.
//
// Provides a temporary dotfiles tree plus home directory, and recording
// stand-ins for the executor and prompt so a whole install can run without
// touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use provision::cli::{GlobalOpts, SkipOpts};
use provision::commands::install::{self, Host};
use provision::exec::{ExecResult, Executor, display_command};
use provision::logging::Logger;
use provision::platform::Platform;
use provision::prompt::Prompt;

/// Every tool preflight may look for.
pub const ALL_TOOLS: &[&str] = &["pacman", "sudo", "git", "makepkg"];

/// Records every command line; fails those starting with a registered prefix.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<String>>,
    failures: Vec<String>,
    on_path: Vec<String>,
}

impl Recorder {
    /// A recorder that reports `tools` as installed.
    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            on_path: tools.iter().map(|t| (*t).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Make commands starting with `prefix` exit non-zero.
    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.failures.push(prefix.to_string());
        self
    }

    /// Command lines seen so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = display_command(program, args);
        self.calls.lock().unwrap().push(line.clone());
        let success = !self.failures.iter().any(|p| line.starts_with(p.as_str()));
        ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        }
    }

    fn checked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.answer(program, args);
        anyhow::ensure!(result.success, "{program} failed");
        Ok(result)
    }
}

impl Executor for Recorder {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_in_with_env(
        &self,
        _: &Path,
        program: &str,
        args: &[&str],
        _: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        self.checked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.answer(program, args))
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.iter().any(|p| p == program)
    }
}

/// Answers prompts from a fixed script, then behaves like closed input.
#[derive(Debug, Default)]
pub struct Answers {
    script: Mutex<Vec<String>>,
    asked: Mutex<Vec<String>>,
}

impl Answers {
    /// Answer with `answers` in order.
    pub fn new(answers: &[&str]) -> Self {
        Self {
            script: Mutex::new(answers.iter().rev().map(|a| (*a).to_string()).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompt for Answers {
    fn ask(&self, question: &str) -> anyhow::Result<Option<String>> {
        self.asked.lock().unwrap().push(question.to_string());
        Ok(self.script.lock().unwrap().pop())
    }
}

/// A dotfiles tree and home directory inside one temp dir.
pub struct Machine {
    dir: tempfile::TempDir,
    /// Platform reported to preflight; Arch, not root, by default.
    pub platform: Platform,
}

impl Machine {
    /// A tree with `home/zshrc`, an empty `config/`, a short package list,
    /// and the security-tools script.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("dotfiles");
        std::fs::create_dir_all(root.join("config")).expect("create config dir");
        std::fs::create_dir_all(root.join("home")).expect("create home dir");
        std::fs::create_dir_all(root.join("scripts")).expect("create scripts dir");
        std::fs::create_dir_all(dir.path().join("user")).expect("create user home");
        std::fs::write(root.join("home/zshrc"), "# managed\n").expect("write zshrc");
        std::fs::write(root.join("scripts/security-tools.sh"), "#!/bin/bash\n")
            .expect("write security script");
        std::fs::write(
            root.join("provision.toml"),
            "packages = [\"git\", \"zsh\"]\nwindow_managers = [\"i3-wm\"]\n",
        )
        .expect("write manifest");
        Self {
            dir,
            platform: Platform::new(true, false),
        }
    }

    /// The dotfiles tree.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("dotfiles")
    }

    /// The user's home directory.
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("user")
    }

    /// Names in the home directory, sorted.
    pub fn home_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.home())
            .expect("read home")
            .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Host description passed to the install command.
    pub fn host(&self) -> Host {
        Host {
            platform: self.platform,
            root: self.root(),
            home: self.home(),
        }
    }

    /// Run a whole install against this machine.
    pub fn install(
        &self,
        global: &GlobalOpts,
        skip: &SkipOpts,
        executor: &Arc<Recorder>,
        prompt: &Arc<Answers>,
    ) -> (anyhow::Result<()>, Arc<Logger>) {
        let log = Arc::new(Logger::new(None));
        let interrupted = AtomicBool::new(false);
        let result = install::run_with(
            global,
            skip,
            &self.host(),
            &log,
            Arc::clone(executor) as Arc<dyn Executor>,
            Arc::clone(prompt) as Arc<dyn Prompt>,
            &interrupted,
        );
        (result, log)
    }
}

/// Options for a run with `--yes`, optionally with `--dry-run`.
pub fn yes(dry_run: bool) -> GlobalOpts {
    GlobalOpts {
        yes: true,
        dry_run,
        root: None,
    }
}

/// Every skip switch turned on.
pub fn skip_everything() -> SkipOpts {
    SkipOpts {
        skip_wm: true,
        skip_themes: true,
        skip_browser: true,
        skip_security: true,
        skip_aur: true,
    }
}
