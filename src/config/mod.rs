//! Run configuration: package lists, optional groups, links, and paths.
pub mod features;
pub mod links;
pub mod manifest;
pub mod packages;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::error::FatalError;
use features::FeatureSet;
use links::Link;
use manifest::Manifest;
use packages::{Group, GroupPayload};

/// All configuration for a single provisioning run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the dotfiles tree.
    pub root: PathBuf,
    /// The user's home directory.
    pub home: PathBuf,
    /// Core packages installed with pacman.
    pub packages: Vec<String>,
    /// Optional groups, in pipeline order.
    pub groups: Vec<Group>,
    /// Links from the dotfiles tree into the home directory.
    pub links: Vec<Link>,
    /// Features enabled for this run.
    pub features: FeatureSet,
}

impl Config {
    /// Build the configuration from built-in defaults, the optional manifest in
    /// `root`, and the links discovered under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be parsed or the dotfiles tree
    /// cannot be listed.
    pub fn load(root: &Path, home: &Path, features: FeatureSet) -> Result<Self> {
        let manifest = Manifest::load(root).context("loading provision.toml")?;
        let config_home = config_home(home);

        let packages = manifest
            .packages
            .clone()
            .unwrap_or_else(|| packages::to_strings(packages::CORE_PACKAGES));

        let groups = packages::default_groups()
            .into_iter()
            .map(|group| apply_override(group, &manifest))
            .collect();

        let mut links = links::discover(root, home, &config_home)
            .with_context(|| format!("discovering links in {}", root.display()))?;
        links.extend(manifest.links.iter().map(|entry| Link {
            source: root.join(&entry.source),
            target: home.join(&entry.target),
        }));

        Ok(Self {
            root: root.to_path_buf(),
            home: home.to_path_buf(),
            packages,
            groups,
            links,
            features,
        })
    }

    /// The group controlled by `feature`, if configured.
    #[must_use]
    pub fn group(&self, feature: features::Feature) -> Option<&Group> {
        self.groups.iter().find(|g| g.feature == feature)
    }
}

/// Replace a group's payload with the manifest's override, if any.
fn apply_override(mut group: Group, manifest: &Manifest) -> Group {
    use features::Feature;

    let names = match group.feature {
        Feature::WindowManagers => manifest.window_managers.clone(),
        Feature::Themes => manifest.themes.clone(),
        Feature::Browser => manifest.browser.clone(),
        Feature::SecurityTools | Feature::AurExtras => None,
    };

    match &mut group.payload {
        GroupPayload::Packages { names: current, .. } => {
            if let Some(names) = names {
                *current = names;
            }
        }
        GroupPayload::Script(path) => {
            if let Some(script) = &manifest.security_script {
                path.clone_from(script);
            }
        }
    }
    group
}

/// Resolve the user's home directory from `HOME`.
///
/// # Errors
///
/// Returns [`FatalError::HomeNotSet`] if `HOME` is unset or empty.
pub fn resolve_home() -> Result<PathBuf, FatalError> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(FatalError::HomeNotSet)
}

/// `$XDG_CONFIG_HOME`, or `<home>/.config` when unset.
#[must_use]
pub fn config_home(home: &Path) -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map_or_else(|| home.join(".config"), PathBuf::from)
}

/// Resolve the dotfiles root from `--root`, `PROVISION_ROOT`, or the current
/// directory, in that order.
///
/// The result is canonicalised when it exists so link sources are absolute.
///
/// # Errors
///
/// Returns an error if no explicit root is given and the current directory
/// cannot be determined.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(root) => root.to_path_buf(),
        None => match std::env::var_os("PROVISION_ROOT").filter(|r| !r.is_empty()) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().context("reading current directory")?,
        },
    };
    Ok(dunce::canonicalize(&root).unwrap_or(root))
}
