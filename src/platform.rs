//! Host detection: distribution and effective user.
use std::path::Path;

/// Marker file present on Arch Linux installs.
const ARCH_RELEASE: &str = "/etc/arch-release";

/// Platform information for the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Whether the host looks like Arch Linux.
    pub is_arch: bool,
    /// Whether the effective user is root.
    pub is_root: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            is_arch: Path::new(ARCH_RELEASE).exists(),
            is_root: nix::unistd::geteuid().is_root(),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(is_arch: bool, is_root: bool) -> Self {
        Self { is_arch, is_root }
    }
}
