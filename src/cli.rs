//! Command-line interface definitions.
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::features::{Feature, FeatureSet};

/// Top-level CLI entry point for the provisioning installer.
#[derive(Parser, Debug)]
#[command(
    name = "provision",
    about = "Provision an Arch Linux machine: packages, optional groups, and dotfile links",
    version
)]
pub struct Cli {
    /// Subcommand to run; `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output (same as `--log-level debug`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Console log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Write the run log to this file instead of the cache directory
    #[arg(long, global = true)]
    pub log_file: Option<std::path::PathBuf>,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Feature skip switches.
    #[command(flatten)]
    pub skip: SkipOpts,
}

impl Cli {
    /// The effective console level after applying `--verbose`.
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Answer yes to every prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Preview changes without applying
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Per-feature skip switches.
#[derive(Parser, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SkipOpts {
    /// Skip window manager installs
    #[arg(long, global = true)]
    pub skip_wm: bool,

    /// Skip theme installs
    #[arg(long, global = true)]
    pub skip_themes: bool,

    /// Skip the browser stack install
    #[arg(long, global = true)]
    pub skip_browser: bool,

    /// Skip the security-tools script
    #[arg(long, global = true)]
    pub skip_security: bool,

    /// Skip the AUR helper and every AUR-based group
    #[arg(long, global = true)]
    pub skip_aur: bool,
}

impl SkipOpts {
    /// Convert the switches into a [`FeatureSet`].
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        let mut set = FeatureSet::all();
        for (flag, feature) in [
            (self.skip_wm, Feature::WindowManagers),
            (self.skip_themes, Feature::Themes),
            (self.skip_browser, Feature::Browser),
            (self.skip_security, Feature::SecurityTools),
            (self.skip_aur, Feature::AurExtras),
        ] {
            if flag {
                set.skip(feature);
            }
        }
        set
    }
}

/// Console verbosity.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including executed command output.
    Debug,
    /// Progress and results.
    #[default]
    Info,
    /// Warnings and errors only.
    Warn,
    /// Errors only.
    Error,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install packages, optional groups, and link configuration files
    Install,
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}
