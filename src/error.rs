//! Fatal error types for the provisioning run.
//!
//! Failures fall into two classes. Fatal ones, defined here, abort the run
//! before any task starts. Recoverable ones (a package, a link, a sub-install)
//! are logged and counted by the task that hit them and never stop the
//! pipeline; see [`crate::resources::error::ResourceError`].
//!
//! Command handlers convert [`FatalError`] to [`anyhow::Error`] with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Conditions under which the installer must not run at all.
#[derive(Error, Debug)]
pub enum FatalError {
    /// The effective user is root and this is not a preview.
    #[error("refusing to run as root: run as your normal user (sudo is invoked when needed)")]
    RunningAsRoot,

    /// A required external tool is not on `PATH`.
    #[error("required tool '{0}' not found on PATH")]
    MissingTool(String),

    /// An expected directory in the dotfiles tree does not exist.
    #[error("expected directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// The home directory could not be determined.
    #[error("HOME environment variable is not set")]
    HomeNotSet,
}
