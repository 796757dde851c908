//! Core logging types: task entries, status, run counters, and the [`Log`] trait.

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task does not apply to this run.
    NotApplicable,
    /// Task was skipped (skip flag, declined prompt, tool missing).
    Skipped,
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
    /// Task encountered one or more errors.
    Failed,
}

/// A run counter incremented through [`Log::tally`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Packages newly installed.
    PackagesInstalled,
    /// Packages already present.
    PackagesSkipped,
    /// Config links created.
    ConfigsLinked,
}

/// Counters accumulated during one run and printed in the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Packages newly installed.
    pub packages_installed: u32,
    /// Packages already present.
    pub packages_skipped: u32,
    /// Config links created.
    pub configs_linked: u32,
    /// Error-level events logged.
    pub errors: u32,
}

impl RunStats {
    /// Add `n` to the field selected by `counter`.
    pub const fn add(&mut self, counter: Counter, n: u32) {
        match counter {
            Counter::PackagesInstalled => self.packages_installed += n,
            Counter::PackagesSkipped => self.packages_skipped += n,
            Counter::ConfigsLinked => self.configs_linked += n,
        }
    }

    /// One-line rendering for the summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "packages: {} installed, {} already present; configs linked: {}; errors: {}",
            self.packages_installed, self.packages_skipped, self.configs_linked, self.errors
        )
    }
}

/// Abstraction over logging backends.
///
/// Task code logs through this trait so that tests can inspect what was
/// recorded without a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message. Every call counts as one error for the run.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
    /// Add `n` to a run counter.
    fn tally(&self, counter: Counter, n: u32);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn task_status_equality() {
        assert_eq!(TaskStatus::Ok, TaskStatus::Ok);
        assert_ne!(TaskStatus::Ok, TaskStatus::Failed);
        assert_ne!(TaskStatus::Skipped, TaskStatus::DryRun);
    }

    #[test]
    fn run_stats_add_selects_field() {
        let mut stats = RunStats::default();
        stats.add(Counter::PackagesInstalled, 3);
        stats.add(Counter::PackagesSkipped, 2);
        stats.add(Counter::ConfigsLinked, 1);
        stats.add(Counter::PackagesInstalled, 1);
        assert_eq!(stats.packages_installed, 4);
        assert_eq!(stats.packages_skipped, 2);
        assert_eq!(stats.configs_linked, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn run_stats_summary() {
        let stats = RunStats {
            packages_installed: 5,
            packages_skipped: 20,
            configs_linked: 3,
            errors: 1,
        };
        assert_eq!(
            stats.summary(),
            "packages: 5 installed, 20 already present; configs linked: 3; errors: 1"
        );
    }
}
