//! Discovery of config links from the dotfiles tree.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Directory under the dotfiles root whose entries link into `$XDG_CONFIG_HOME`.
pub const CONFIG_DIR: &str = "config";

/// Optional directory under the dotfiles root whose entries link into `$HOME`
/// as dotfiles (`home/zshrc` becomes `~/.zshrc`).
pub const HOME_DIR: &str = "home";

/// A single link from the dotfiles tree into the home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute source path inside the dotfiles tree.
    pub source: PathBuf,
    /// Absolute target path where the symlink is created.
    pub target: PathBuf,
}

/// Sorted immediate children of `dir`; empty when `dir` does not exist.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|e| e.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading entry in {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

/// Discover links from `root/config` and `root/home`.
///
/// # Errors
///
/// Returns an error if either directory exists but cannot be listed.
pub fn discover(root: &Path, home: &Path, config_home: &Path) -> Result<Vec<Link>> {
    let mut links = Vec::new();

    for source in sorted_entries(&root.join(CONFIG_DIR))? {
        if let Some(name) = source.file_name() {
            let target = config_home.join(name);
            links.push(Link { source, target });
        }
    }

    for source in sorted_entries(&root.join(HOME_DIR))? {
        if let Some(name) = source.file_name() {
            let name = name.to_string_lossy();
            let dotted = if name.starts_with('.') {
                name.to_string()
            } else {
                format!(".{name}")
            };
            links.push(Link {
                target: home.join(dotted),
                source,
            });
        }
    }

    Ok(links)
}
