//! Optional `provision.toml` manifest that overrides the built-in lists.
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// File name of the manifest inside the dotfiles root.
pub const MANIFEST_FILE: &str = "provision.toml";

/// An extra link declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    /// Source path relative to the dotfiles root.
    pub source: PathBuf,
    /// Target path relative to the home directory.
    pub target: PathBuf,
}

/// Overrides read from `provision.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Replaces the core package list.
    pub packages: Option<Vec<String>>,
    /// Replaces the window manager packages.
    pub window_managers: Option<Vec<String>>,
    /// Replaces the theme packages.
    pub themes: Option<Vec<String>>,
    /// Replaces the browser packages.
    pub browser: Option<Vec<String>>,
    /// Replaces the security-tools script path.
    pub security_script: Option<PathBuf>,
    /// Extra links, appended to the discovered ones.
    #[serde(rename = "link")]
    pub links: Vec<LinkEntry>,
}

impl Manifest {
    /// Load the manifest from `root`, returning defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a link path does not name an entry below its base directory.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        for link in &manifest.links {
            check_relative(&link.source, "source", "dotfiles root")
                .and_then(|()| check_relative(&link.target, "target", "home directory"))
                .with_context(|| format!("Invalid link in manifest: {}", path.display()))?;
        }
        Ok(manifest)
    }
}

/// Require `path` to stay below the directory it is joined onto.
fn check_relative(path: &Path, what: &str, base: &str) -> Result<()> {
    let stays_below = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    let names_entry = path.components().any(|c| matches!(c, Component::Normal(_)));
    if !stays_below || !names_entry {
        anyhow::bail!(
            "link {what} {} must be a relative path inside the {base}",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn write_manifest(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), content).unwrap();
        dir
    }

    #[test]
    fn missing_manifest_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn empty_manifest_is_default() {
        let dir = write_manifest("");
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn parses_overrides_and_links() {
        let dir = write_manifest(
            r#"
packages = ["git", "neovim"]
browser = ["librewolf-bin"]
security_script = "scripts/harden.sh"

[[link]]
source = "zsh/zshrc"
target = ".zshrc"
"#,
        );
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(
            manifest.packages,
            Some(vec!["git".to_string(), "neovim".to_string()])
        );
        assert_eq!(manifest.browser, Some(vec!["librewolf-bin".to_string()]));
        assert!(manifest.themes.is_none());
        assert_eq!(
            manifest.security_script,
            Some(PathBuf::from("scripts/harden.sh"))
        );
        assert_eq!(manifest.links.len(), 1);
        assert_eq!(manifest.links[0].target, PathBuf::from(".zshrc"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = write_manifest("pakages = [\"git\"]\n");
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(
            format!("{err:#}").contains("Failed to parse manifest"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn absolute_link_target_is_rejected() {
        let dir = write_manifest("[[link]]\nsource = \"zshrc\"\ntarget = \"/etc/passwd\"\n");
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(
            format!("{err:#}").contains("link target /etc/passwd must be a relative path"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn parent_dir_in_link_is_rejected() {
        let dir = write_manifest("[[link]]\nsource = \"zshrc\"\ntarget = \"../other/.zshrc\"\n");
        assert!(Manifest::load(dir.path()).is_err());

        let dir = write_manifest("[[link]]\nsource = \"../secrets\"\ntarget = \".secrets\"\n");
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(
            format!("{err:#}").contains("inside the dotfiles root"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn empty_link_target_is_rejected() {
        let dir = write_manifest("[[link]]\nsource = \"zshrc\"\ntarget = \"\"\n");
        assert!(Manifest::load(dir.path()).is_err());

        let dir = write_manifest("[[link]]\nsource = \"zshrc\"\ntarget = \".\"\n");
        assert!(Manifest::load(dir.path()).is_err());
    }
}
