//! System upgrade.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};

/// Full system upgrade before installing anything.
#[derive(Debug)]
pub struct UpdateSystem;

impl Task for UpdateSystem {
    fn name(&self) -> &'static str {
        "Update system"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let ran = ctx
            .run_or_preview("sudo", &["pacman", "-Syu", "--noconfirm"])
            .context("upgrading system packages")?;
        Ok(if ran.is_some() {
            ctx.log.info("system up to date");
            TaskResult::Ok
        } else {
            TaskResult::DryRun
        })
    }
}
