//! Linking configuration from the dotfiles tree into the home directory.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::logging::Counter;
use crate::resources::symlink::{SymlinkResource, backup_stamp};
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ResourceState};

/// Backup-then-symlink every configured link.
#[derive(Debug)]
pub struct LinkConfigs;

/// Bring one link into place and report what happened.
fn link_one(ctx: &Context, resource: &SymlinkResource, stamp: &str) -> Result<ResourceChange> {
    match resource.current_state()? {
        ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
        ResourceState::Invalid { reason } => Ok(ResourceChange::Skipped { reason }),
        ResourceState::Missing => {
            if ctx.dry_run {
                ctx.log.dry_run(&format!("link {}", resource.description()));
            } else {
                resource.apply_with_stamp(stamp)?;
            }
            Ok(ResourceChange::Applied)
        }
        ResourceState::Incorrect { current } => {
            if ctx.dry_run {
                ctx.log.dry_run(&format!(
                    "back up {} ({current}) and link {}",
                    resource.target.display(),
                    resource.description()
                ));
            } else if let Some(backup) = resource.apply_with_stamp(stamp)? {
                ctx.log.info(&format!(
                    "backed up {} to {}",
                    resource.target.display(),
                    backup.display()
                ));
            }
            Ok(ResourceChange::Applied)
        }
    }
}

impl Task for LinkConfigs {
    fn name(&self) -> &'static str {
        "Link configs"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.config.links.is_empty() {
            return Ok(TaskResult::Skipped("no configs to link".to_string()));
        }

        let stamp = backup_stamp();
        let mut stats = TaskStats::new();
        for link in &ctx.config.links {
            let resource = SymlinkResource::new(link.source.clone(), link.target.clone());
            match link_one(ctx, &resource, &stamp) {
                Ok(ResourceChange::Applied) => {
                    if !ctx.dry_run {
                        ctx.log.info(&format!("linked {}", resource.description()));
                        ctx.log.tally(Counter::ConfigsLinked, 1);
                    }
                    stats.changed += 1;
                }
                Ok(ResourceChange::AlreadyCorrect) => {
                    ctx.log.debug(&format!("ok: {}", resource.description()));
                    stats.already_ok += 1;
                }
                Ok(ResourceChange::Skipped { reason }) => {
                    ctx.log.error(&format!(
                        "cannot link {}: {reason}",
                        resource.target.display()
                    ));
                    stats.failed += 1;
                }
                Err(e) => {
                    ctx.log.error(&format!(
                        "failed to link {}: {e:#}",
                        resource.description()
                    ));
                    stats.failed += 1;
                }
            }
        }
        Ok(stats.finish(ctx))
    }
}
