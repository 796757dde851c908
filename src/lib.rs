//! Arch Linux provisioning engine.
//!
//! Brings a fresh Arch install up to a known state: a full system upgrade,
//! the core package list, an AUR helper, optional software groups behind
//! confirmation prompts, and symlinks from a dotfiles tree into `$HOME`
//! with timestamped backups of anything already there.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** resolve package lists, groups, and links for a run
//! - **[`resources`]** idempotent `check + apply` primitives (symlinks, packages)
//! - **[`tasks`]** named, ordered units of work wired to resources
//! - **[`commands`]** top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod preflight;
pub mod prompt;
pub mod resources;
pub mod tasks;
