//! Symlink resource with timestamped backups.
use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::error::ResourceError;
use super::fs::{ensure_parent_dir, path_occupied};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// Timestamp format used in backup names.
const BACKUP_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// A symlink resource that can be checked and applied.
///
/// Applying moves whatever currently occupies the target aside to
/// `<target>.bak.<stamp>` and then links the target to the source.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Link the target, backing up any existing content with `stamp`.
    ///
    /// Returns the backup path when something was moved aside.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Overlap`] when the target resolves onto the
    /// source, and [`ResourceError::Backup`] or [`ResourceError::Link`] when
    /// the rename or the symlink call fails.
    pub fn apply_with_stamp(&self, stamp: &str) -> Result<Option<PathBuf>> {
        if self.overlap().is_some() {
            return Err(ResourceError::Overlap {
                target: self.target.clone(),
                link_source: self.source.clone(),
            }
            .into());
        }
        ensure_parent_dir(&self.target)?;

        let backup = if path_occupied(&self.target) {
            let backup = backup_path(&self.target, stamp);
            std::fs::rename(&self.target, &backup).map_err(|source| ResourceError::Backup {
                target: self.target.clone(),
                backup: backup.clone(),
                source,
            })?;
            Some(backup)
        } else {
            None
        };

        std::os::unix::fs::symlink(&self.source, &self.target).map_err(|source| {
            ResourceError::Link {
                target: self.target.clone(),
                link_source: self.source.clone(),
                source,
            }
        })?;

        Ok(backup)
    }

    /// How the target relates to the source once symlinks in the target's
    /// parent are followed. `None` when they are unrelated.
    fn overlap(&self) -> Option<Overlap> {
        let source = dunce::canonicalize(&self.source).ok()?;
        let parent = dunce::canonicalize(self.target.parent()?).ok()?;
        let target = parent.join(self.target.file_name()?);
        if target == source {
            Some(Overlap::Same)
        } else if source.starts_with(&target) {
            Some(Overlap::Ancestor)
        } else {
            None
        }
    }
}

/// Ways a target path can land on its own source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// The target already is the source, reached through a linked parent.
    Same,
    /// The target is a directory the source lives in.
    Ancestor,
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.apply_with_stamp(&backup_stamp())?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        match self.overlap() {
            Some(Overlap::Same) => return Ok(ResourceState::Correct),
            Some(Overlap::Ancestor) => {
                return Ok(ResourceState::Invalid {
                    reason: format!("{} contains the source", self.target.display()),
                });
            }
            None => {}
        }

        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        if meta.is_symlink() {
            let existing = std::fs::read_link(&self.target)?;
            if existing == self.source {
                return Ok(ResourceState::Correct);
            }
            return Ok(ResourceState::Incorrect {
                current: format!("points to {}", existing.display()),
            });
        }

        let kind = if meta.is_dir() { "directory" } else { "regular file" };
        Ok(ResourceState::Incorrect {
            current: format!("target is a {kind}"),
        })
    }
}

/// Current local time rendered for a backup name.
#[must_use]
pub fn backup_stamp() -> String {
    chrono::Local::now().format(BACKUP_STAMP_FORMAT).to_string()
}

/// First free backup path for `target`: `<target>.bak.<stamp>`, then
/// `<target>.bak.<stamp>-1`, `-2`, and so on.
#[must_use]
pub fn backup_path(target: &Path, stamp: &str) -> PathBuf {
    let with_suffix = |suffix: Option<u32>| {
        let mut name = OsString::from(target.as_os_str());
        name.push(".bak.");
        name.push(stamp);
        if let Some(n) = suffix {
            name.push(format!("-{n}"));
        }
        PathBuf::from(name)
    };

    let first = with_suffix(None);
    if !path_occupied(&first) {
        return first;
    }
    (1..)
        .map(|n| with_suffix(Some(n)))
        .find(|candidate| !path_occupied(candidate))
        .unwrap_or(first)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    const STAMP: &str = "20240102-030405";

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dotfiles/zshrc");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, "# managed\n").unwrap();
        let target = dir.path().join("home/.zshrc");
        (dir, source, target)
    }

    #[test]
    fn description_shows_direction() {
        let r = SymlinkResource::new(PathBuf::from("/df/zshrc"), PathBuf::from("/h/.zshrc"));
        assert_eq!(r.description(), "/h/.zshrc -> /df/zshrc");
    }

    #[test]
    fn state_invalid_when_source_missing() {
        let (dir, _source, target) = setup();
        let r = SymlinkResource::new(dir.path().join("nope"), target);
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn state_missing_when_target_absent() {
        let (_dir, source, target) = setup();
        let r = SymlinkResource::new(source, target);
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn state_incorrect_for_regular_file() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "mine").unwrap();
        let r = SymlinkResource::new(source, target);
        assert_eq!(
            r.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "target is a regular file".to_string()
            }
        );
    }

    #[test]
    fn state_incorrect_for_dangling_symlink() {
        let (dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), &target).unwrap();
        let r = SymlinkResource::new(source, target);
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn state_correct_after_apply() {
        let (_dir, source, target) = setup();
        let r = SymlinkResource::new(source, target);
        r.apply().unwrap();
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert!(!r.needs_change().unwrap());
    }

    #[test]
    fn apply_creates_parent_and_link_without_backup() {
        let (_dir, source, target) = setup();
        let r = SymlinkResource::new(source.clone(), target.clone());
        let backup = r.apply_with_stamp(STAMP).unwrap();
        assert!(backup.is_none());
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn apply_backs_up_file_preserving_content() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "precious bytes\n").unwrap();

        let r = SymlinkResource::new(source.clone(), target.clone());
        let backup = r.apply_with_stamp(STAMP).unwrap().unwrap();

        assert_eq!(
            backup.file_name().unwrap().to_string_lossy(),
            ".zshrc.bak.20240102-030405"
        );
        assert_eq!(fs::read_to_string(&backup).unwrap(), "precious bytes\n");
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn apply_backs_up_directory() {
        let (dir, _source, _) = setup();
        let source = dir.path().join("dotfiles/nvim");
        fs::create_dir_all(&source).unwrap();
        let target = dir.path().join("home/.config/nvim");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("init.lua"), "-- old").unwrap();

        let r = SymlinkResource::new(source.clone(), target.clone());
        let backup = r.apply_with_stamp(STAMP).unwrap().unwrap();

        assert_eq!(fs::read_to_string(backup.join("init.lua")).unwrap(), "-- old");
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn apply_backs_up_dangling_symlink() {
        let (dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        let gone = dir.path().join("gone");
        std::os::unix::fs::symlink(&gone, &target).unwrap();

        let r = SymlinkResource::new(source.clone(), target.clone());
        let backup = r.apply_with_stamp(STAMP).unwrap().unwrap();

        assert_eq!(fs::read_link(&backup).unwrap(), gone);
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn backup_path_appends_counter_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(".bashrc");
        let first = backup_path(&target, STAMP);
        assert!(first.ends_with(".bashrc.bak.20240102-030405"));

        fs::write(&first, "").unwrap();
        let second = backup_path(&target, STAMP);
        assert!(second.ends_with(".bashrc.bak.20240102-030405-1"));

        fs::write(&second, "").unwrap();
        let third = backup_path(&target, STAMP);
        assert!(third.ends_with(".bashrc.bak.20240102-030405-2"));
    }

    #[test]
    fn repeated_applies_in_same_second_keep_every_backup() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "v1").unwrap();

        let r = SymlinkResource::new(source, target.clone());
        let b1 = r.apply_with_stamp(STAMP).unwrap().unwrap();

        fs::remove_file(&target).unwrap();
        fs::write(&target, "v2").unwrap();
        let b2 = r.apply_with_stamp(STAMP).unwrap().unwrap();

        assert_ne!(b1, b2);
        assert_eq!(fs::read_to_string(b1).unwrap(), "v1");
        assert_eq!(fs::read_to_string(b2).unwrap(), "v2");
    }

    #[test]
    fn backup_stamp_has_expected_shape() {
        let stamp = backup_stamp();
        assert_eq!(stamp.len(), 15, "YYYYmmdd-HHMMSS: {stamp}");
        assert_eq!(&stamp[8..9], "-");
    }

    #[test]
    fn apply_fails_when_parent_is_a_file() {
        let (dir, source, _) = setup();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let r = SymlinkResource::new(source, blocker.join("child"));
        let err = r.apply_with_stamp(STAMP).unwrap_err();
        assert!(err.to_string().contains("create parent"), "{err}");
    }

    #[test]
    fn state_correct_when_parent_links_into_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dotfiles/config/nvim");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("init.lua"), "-- managed").unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("dotfiles/config"),
            dir.path().join("home/.config"),
        )
        .unwrap();

        let r = SymlinkResource::new(source, dir.path().join("home/.config/nvim"));
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert!(!r.needs_change().unwrap());
    }

    #[test]
    fn apply_refuses_target_resolving_onto_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dotfiles/config/nvim");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("init.lua"), "-- managed").unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("dotfiles/config"),
            dir.path().join("home/.config"),
        )
        .unwrap();

        let r = SymlinkResource::new(source.clone(), dir.path().join("home/.config/nvim"));
        let err = r.apply_with_stamp(STAMP).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::Overlap { .. })
        ));
        assert!(source.is_dir());
        assert_eq!(fs::read_to_string(source.join("init.lua")).unwrap(), "-- managed");
        assert!(!dir.path().join("dotfiles/config/nvim.bak.20240102-030405").exists());
    }

    #[test]
    fn state_invalid_when_target_contains_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dotfiles/config/nvim");
        fs::create_dir_all(&source).unwrap();
        let r = SymlinkResource::new(source.clone(), dir.path().join("dotfiles"));

        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert!(r.apply_with_stamp(STAMP).is_err());
        assert!(source.is_dir());
    }
}
