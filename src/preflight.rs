//! Fatal safety checks run before any task.
use std::path::Path;

use crate::config::features::{Feature, FeatureSet};
use crate::config::links::CONFIG_DIR;
use crate::error::FatalError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;

/// Tools every run needs.
pub const REQUIRED_TOOLS: &[&str] = &["pacman", "sudo", "git"];

/// Needed to build the AUR helper.
pub const AUR_BUILD_TOOL: &str = "makepkg";

/// Tools required for this run, given which features are enabled.
#[must_use]
pub fn required_tools(features: &FeatureSet) -> Vec<&'static str> {
    let mut tools = REQUIRED_TOOLS.to_vec();
    if features.is_enabled(Feature::AurExtras) {
        tools.push(AUR_BUILD_TOOL);
    }
    tools
}

/// Verify the environment, stopping at the first fatal problem.
///
/// Order: effective user, required tools, dotfiles tree. A host that does not
/// look like Arch Linux only produces a warning.
///
/// # Errors
///
/// Returns the first [`FatalError`] found.
pub fn verify_environment(
    platform: &Platform,
    executor: &dyn Executor,
    log: &dyn Log,
    dry_run: bool,
    features: &FeatureSet,
    root: &Path,
) -> Result<(), FatalError> {
    if platform.is_root && !dry_run {
        return Err(FatalError::RunningAsRoot);
    }

    if !platform.is_arch {
        log.warn("this does not look like Arch Linux (/etc/arch-release missing)");
    }

    for tool in required_tools(features) {
        if !executor.which(tool) {
            return Err(FatalError::MissingTool(tool.to_string()));
        }
        log.debug(&format!("found {tool}"));
    }

    let config_dir = root.join(CONFIG_DIR);
    for dir in [root, config_dir.as_path()] {
        if !dir.is_dir() {
            return Err(FatalError::MissingDirectory(dir.to_path_buf()));
        }
    }

    Ok(())
}
