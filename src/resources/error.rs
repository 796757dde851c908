//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations.  Resource code returns these variants
//! through [`anyhow::Result`]; the task that hit one logs it and moves on.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Moving an existing target aside failed.
    #[error("could not back up {} to {}: {source}", .target.display(), .backup.display())]
    Backup {
        /// Path that was being moved aside.
        target: PathBuf,
        /// Intended backup path.
        backup: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Creating the symlink failed.
    #[error("could not link {} -> {}: {source}", .target.display(), .link_source.display())]
    Link {
        /// Path of the link being created.
        target: PathBuf,
        /// Path the link should point to.
        link_source: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The target resolves to the source or to a directory containing it.
    #[error("{} resolves onto {}; refusing to move it aside", .target.display(), .link_source.display())]
    Overlap {
        /// Path of the link being created.
        target: PathBuf,
        /// Path the link should point to.
        link_source: PathBuf,
    },

    /// A command invoked by a resource failed with a non-zero exit code.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    ExecutionFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process.
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A required resource (file, script, etc.) was not found.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn execution_failed_display() {
        let e = ResourceError::ExecutionFailed {
            program: "pacman".to_string(),
            exit_code: 1,
            stderr: "target not found".to_string(),
        };
        assert!(e.to_string().contains("pacman"));
        assert!(e.to_string().contains("exit 1"));
        assert!(e.to_string().contains("target not found"));
    }

    #[test]
    fn not_found_display() {
        let e = ResourceError::NotFound {
            resource: "scripts/security-tools.sh".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "resource not found: scripts/security-tools.sh"
        );
    }

    #[test]
    fn backup_display_names_both_paths() {
        let e = ResourceError::Backup {
            target: PathBuf::from("/home/u/.zshrc"),
            backup: PathBuf::from("/home/u/.zshrc.bak.20240101-000000"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = e.to_string();
        assert!(msg.contains("/home/u/.zshrc"));
        assert!(msg.contains(".bak.20240101-000000"));
    }

    #[test]
    fn link_display_names_both_paths() {
        let e = ResourceError::Link {
            target: PathBuf::from("/home/u/.config/nvim"),
            link_source: PathBuf::from("/dotfiles/config/nvim"),
            source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("could not link /home/u/.config/nvim -> /dotfiles/config/nvim"));
    }

    #[test]
    fn resource_error_converts_to_anyhow() {
        let e = ResourceError::NotFound {
            resource: "vim".to_string(),
        };
        let anyhow_err: anyhow::Error = e.into();
        assert!(anyhow_err.downcast_ref::<ResourceError>().is_some());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resource_error_is_send_sync() {
        assert_send_sync::<ResourceError>();
    }
}
