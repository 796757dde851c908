//! Named tasks that make up the provisioning pipeline, run in declared order.
pub mod context;
pub mod groups;
pub mod links;
pub mod packages;
pub mod system;

pub use context::Context;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::config::features::Feature;
use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use provision::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("--skip-wm".into());
/// let failed = TaskResult::Failed("2 packages failed".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(failed, TaskResult::Failed(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped (skip flag, declined, or nothing to do).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
    /// Some items failed; each failure was already logged as an error.
    Failed(String),
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use provision::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 3, already_ok: 10, failed: 0 };
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
///
/// let stats = TaskStats { changed: 1, already_ok: 2, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items whose change failed.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            TaskResult::Failed(format!("{} failed", self.failed))
        } else if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to this run at all.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails as a whole, such as when a system
    /// command exits non-zero or a required file is missing.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(system::UpdateSystem),
        Box::new(packages::InstallPackages),
        Box::new(packages::InstallAurHelper),
        Box::new(groups::InstallGroup::new(Feature::WindowManagers)),
        Box::new(groups::InstallGroup::new(Feature::Themes)),
        Box::new(groups::InstallGroup::new(Feature::Browser)),
        Box::new(groups::InstallGroup::new(Feature::SecurityTools)),
        Box::new(links::LinkConfigs),
    ]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Ok(TaskResult::Failed(reason)) => {
            ctx.log.warn(&format!("{}: {reason}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&reason));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Run `tasks` in order, stopping early once `interrupted` is set.
///
/// Tasks not started because of an interruption are recorded as skipped and
/// the interruption is logged as a single error.
pub fn run_all(tasks: &[Box<dyn Task>], ctx: &Context, interrupted: &AtomicBool) {
    let mut pending = tasks.iter();
    for task in pending.by_ref() {
        if interrupted.load(Ordering::SeqCst) {
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some("interrupted"));
            break;
        }
        execute(task.as_ref(), ctx);
    }

    let remaining: Vec<_> = pending.collect();
    for task in &remaining {
        ctx.log
            .record_task(task.name(), TaskStatus::Skipped, Some("interrupted"));
    }

    if interrupted.load(Ordering::SeqCst) {
        ctx.log.error("interrupted: remaining tasks were skipped");
    }
}
