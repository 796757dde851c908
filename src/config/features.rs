//! Optional feature blocks and their enable/skip state.
use std::collections::BTreeSet;
use std::fmt;

/// An optional block of work that the user can switch off from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    /// Tiling window managers and their companions.
    WindowManagers,
    /// GTK/icon/cursor themes.
    Themes,
    /// The patched browser stack from the AUR.
    Browser,
    /// The security-tools sub-script.
    SecurityTools,
    /// The AUR helper and everything installed through it.
    AurExtras,
}

impl Feature {
    /// Every feature, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::WindowManagers,
        Self::Themes,
        Self::Browser,
        Self::SecurityTools,
        Self::AurExtras,
    ];

    /// The CLI switch that disables this feature.
    #[must_use]
    pub const fn skip_flag(self) -> &'static str {
        match self {
            Self::WindowManagers => "--skip-wm",
            Self::Themes => "--skip-themes",
            Self::Browser => "--skip-browser",
            Self::SecurityTools => "--skip-security",
            Self::AurExtras => "--skip-aur",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowManagers => write!(f, "window managers"),
            Self::Themes => write!(f, "themes"),
            Self::Browser => write!(f, "browser"),
            Self::SecurityTools => write!(f, "security tools"),
            Self::AurExtras => write!(f, "AUR extras"),
        }
    }
}

/// The set of features switched off for this run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    skipped: BTreeSet<Feature>,
}

impl FeatureSet {
    /// A set with every feature enabled.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Switch `feature` off.
    pub fn skip(&mut self, feature: Feature) {
        self.skipped.insert(feature);
    }

    /// Whether `feature` is enabled for this run.
    #[must_use]
    pub fn is_enabled(&self, feature: Feature) -> bool {
        !self.skipped.contains(&feature)
    }

    /// Features switched off, in pipeline order.
    pub fn skipped(&self) -> impl Iterator<Item = Feature> + '_ {
        self.skipped.iter().copied()
    }
}
