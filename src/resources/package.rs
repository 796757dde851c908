//! Package installation resource.
use std::collections::HashSet;

use anyhow::Result;

use super::{Applicable, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Official Arch Linux packages (pacman, through sudo).
    Pacman,
    /// AUR packages (paru, which elevates on its own).
    Paru,
}

impl PackageManager {
    /// Program and leading arguments of an install command.
    #[must_use]
    pub const fn install_prefix(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Pacman => ("sudo", &["pacman", "-S", "--needed", "--noconfirm"]),
            Self::Paru => ("paru", &["-S", "--needed", "--noconfirm"]),
        }
    }

    /// Full install command line for `names`, as `(program, args)`.
    #[must_use]
    pub fn install_command<'a>(self, names: &[&'a str]) -> (&'static str, Vec<&'a str>) {
        let (program, prefix) = self.install_prefix();
        let mut args: Vec<&str> = prefix.to_vec();
        args.extend_from_slice(names);
        (program, args)
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pacman => write!(f, "pacman"),
            Self::Paru => write!(f, "paru"),
        }
    }
}

/// A system package resource that can be checked and installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name.
    pub name: String,
    /// Package manager to use.
    pub manager: PackageManager,
    /// Executor for running package manager commands.
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(name: String, manager: PackageManager, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            manager,
            executor,
        }
    }

    /// Determine the resource state from a pre-fetched set of installed package names.
    ///
    /// This avoids running a per-package query when used with
    /// [`get_installed_packages`].
    #[must_use]
    pub fn state_from_installed(&self, installed: &HashSet<String>) -> ResourceState {
        if installed.contains(&self.name) {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

/// Query the full set of installed package names.
///
/// Both managers share the pacman database, so a single `pacman -Q` answers
/// for AUR packages too. A failing query yields an empty set.
///
/// # Errors
///
/// Returns an error if `pacman` cannot be spawned.
pub fn get_installed_packages(executor: &dyn Executor) -> Result<HashSet<String>> {
    // "name version" per line
    let result = executor.run_unchecked("pacman", &["-Q"])?;
    let mut set = HashSet::new();
    if result.success {
        for line in result.stdout.lines() {
            if let Some(name) = line.split_whitespace().next() {
                set.insert(name.to_string());
            }
        }
    }
    Ok(set)
}

/// Install `resources` with one command per package manager.
///
/// For pacman the command is `sudo pacman -S --needed --noconfirm <names…>`;
/// for paru it is `paru -S --needed --noconfirm <names…>`.
///
/// # Errors
///
/// Returns an error if any package manager command fails.
pub fn batch_install_packages(resources: &[&PackageResource<'_>]) -> Result<()> {
    for manager in [PackageManager::Pacman, PackageManager::Paru] {
        let Some(first) = resources.iter().find(|r| r.manager == manager) else {
            continue;
        };
        let names: Vec<&str> = resources
            .iter()
            .filter(|r| r.manager == manager)
            .map(|r| r.name.as_str())
            .collect();
        let (program, args) = manager.install_command(&names);
        first.executor.run(program, &args)?;
    }
    Ok(())
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.manager)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let (program, args) = self.manager.install_command(&[self.name.as_str()]);
        self.executor.run(program, &args)?;
        Ok(ResourceChange::Applied)
    }
}
