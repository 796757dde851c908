//! Built-in package lists and optional software groups.
use std::path::PathBuf;

use super::features::Feature;
use crate::resources::package::PackageManager;

/// Core packages installed on every run with pacman.
pub const CORE_PACKAGES: &[&str] = &[
    "base-devel",
    "git",
    "curl",
    "wget",
    "unzip",
    "zsh",
    "neovim",
    "tmux",
    "htop",
    "ripgrep",
    "fd",
    "fzf",
    "bat",
    "jq",
    "openssh",
    "xorg-server",
    "xorg-xinit",
    "xclip",
    "alacritty",
    "picom",
    "dunst",
    "rofi",
    "feh",
    "pipewire",
    "pipewire-pulse",
    "wireplumber",
    "noto-fonts",
    "noto-fonts-emoji",
    "ttf-jetbrains-mono-nerd",
];

/// Window managers (official repositories).
pub const WINDOW_MANAGER_PACKAGES: &[&str] = &["i3-wm", "i3status", "i3lock", "bspwm", "sxhkd"];

/// Themes (AUR).
pub const THEME_PACKAGES: &[&str] = &[
    "catppuccin-gtk-theme-mocha",
    "papirus-icon-theme",
    "bibata-cursor-theme-bin",
];

/// Patched browser stack (AUR).
pub const BROWSER_PACKAGES: &[&str] = &["librewolf-bin", "ungoogled-chromium-bin"];

/// Security-tools script, relative to the dotfiles root.
pub const SECURITY_SCRIPT: &str = "scripts/security-tools.sh";

/// What an optional group does when enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPayload {
    /// Install `names` with `manager`.
    Packages {
        /// Package manager to install with.
        manager: PackageManager,
        /// Package names.
        names: Vec<String>,
    },
    /// Run a shell script, path relative to the dotfiles root.
    Script(PathBuf),
}

/// A user-selectable block of software.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The feature switch that controls this group.
    pub feature: Feature,
    /// The group's payload.
    pub payload: GroupPayload,
}

impl Group {
    /// Whether this group needs the AUR helper.
    #[must_use]
    pub const fn needs_aur(&self) -> bool {
        matches!(
            self.payload,
            GroupPayload::Packages {
                manager: PackageManager::Paru,
                ..
            }
        )
    }
}

/// Convert a static list into owned names.
#[must_use]
pub fn to_strings(slice: &[&str]) -> Vec<String> {
    slice.iter().map(|s| (*s).to_string()).collect()
}

/// The built-in optional groups, in pipeline order.
#[must_use]
pub fn default_groups() -> Vec<Group> {
    vec![
        Group {
            feature: Feature::WindowManagers,
            payload: GroupPayload::Packages {
                manager: PackageManager::Pacman,
                names: to_strings(WINDOW_MANAGER_PACKAGES),
            },
        },
        Group {
            feature: Feature::Themes,
            payload: GroupPayload::Packages {
                manager: PackageManager::Paru,
                names: to_strings(THEME_PACKAGES),
            },
        },
        Group {
            feature: Feature::Browser,
            payload: GroupPayload::Packages {
                manager: PackageManager::Paru,
                names: to_strings(BROWSER_PACKAGES),
            },
        },
        Group {
            feature: Feature::SecurityTools,
            payload: GroupPayload::Script(PathBuf::from(SECURITY_SCRIPT)),
        },
    ]
}
