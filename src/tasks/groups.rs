//! Optional software groups, each behind a skip flag and a confirmation.
use anyhow::{Context as _, Result};

use super::packages::{AUR_HELPER, install_missing};
use super::{Context, Task, TaskResult};
use crate::config::features::Feature;
use crate::config::packages::GroupPayload;
use crate::resources::error::ResourceError;

/// Install (or run) one optional group.
#[derive(Debug)]
pub struct InstallGroup {
    feature: Feature,
    name: String,
}

impl InstallGroup {
    /// Task for the group controlled by `feature`.
    #[must_use]
    pub fn new(feature: Feature) -> Self {
        let name = match feature {
            Feature::SecurityTools => format!("Run {feature}"),
            _ => format!("Install {feature}"),
        };
        Self { feature, name }
    }
}

impl Task for InstallGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.group(self.feature).is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(group) = ctx.config.group(self.feature) else {
            return Ok(TaskResult::Skipped("not configured".to_string()));
        };

        if !ctx.enabled(self.feature) {
            return Ok(TaskResult::Skipped(self.feature.skip_flag().to_string()));
        }

        if group.needs_aur() {
            if !ctx.enabled(Feature::AurExtras) {
                return Ok(TaskResult::Skipped(
                    Feature::AurExtras.skip_flag().to_string(),
                ));
            }
            // In a preview the helper task only logged its install.
            if !ctx.dry_run && !ctx.executor.which(AUR_HELPER) {
                return Ok(TaskResult::Skipped(format!("{AUR_HELPER} not available")));
            }
        }

        if !ctx.confirm(&format!("Install {}?", self.feature))? {
            return Ok(TaskResult::Skipped("declined".to_string()));
        }

        match &group.payload {
            GroupPayload::Packages { manager, names } => install_missing(ctx, *manager, names),
            GroupPayload::Script(script) => {
                let path = ctx.root().join(script);
                if !path.is_file() {
                    return Err(ResourceError::NotFound {
                        resource: path.display().to_string(),
                    }
                    .into());
                }
                let path_str = path.to_string_lossy();
                let ran = ctx
                    .run_or_preview("bash", &[&path_str])
                    .with_context(|| format!("running {}", script.display()))?;
                Ok(if ran.is_some() {
                    TaskResult::Ok
                } else {
                    TaskResult::DryRun
                })
            }
        }
    }
}
