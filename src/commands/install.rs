//! Command: provision the machine.
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::cli::{GlobalOpts, SkipOpts};
use crate::config::features::{Feature, FeatureSet};
use crate::config::{self, Config};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::preflight;
use crate::prompt::{Prompt, StdinPrompt};
use crate::tasks::{self, Context};

/// Set from the Ctrl-C handler; checked between tasks.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Where and as whom the install runs.
#[derive(Debug, Clone)]
pub struct Host {
    /// Detected platform facts.
    pub platform: Platform,
    /// Root of the dotfiles tree.
    pub root: PathBuf,
    /// The user's home directory.
    pub home: PathBuf,
}

impl Host {
    /// Detect the platform and resolve the root and home directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved or `HOME` is unset.
    pub fn detect(root: Option<&Path>) -> Result<Self> {
        Ok(Self {
            platform: Platform::detect(),
            root: config::resolve_root(root)?,
            home: config::resolve_home()?,
        })
    }
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if a preflight check fails, the configuration cannot be
/// loaded, or any error was logged during the run.
pub fn run(global: &GlobalOpts, skip: &SkipOpts, log_file: PathBuf) -> Result<()> {
    let log = Arc::new(Logger::new(Some(log_file)));

    if let Err(e) = ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst)) {
        log.warn(&format!("cannot install Ctrl-C handler: {e}"));
    }

    let result = match Host::detect(global.root.as_deref()) {
        Ok(host) => run_with(
            global,
            skip,
            &host,
            &log,
            Arc::new(SystemExecutor),
            Arc::new(StdinPrompt),
            &INTERRUPTED,
        ),
        Err(e) => {
            log.error(&format!("{e:#}"));
            Err(e)
        }
    };
    log.print_summary();
    result
}

/// Body of [`run`] with the host and side-effecting collaborators injected.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    global: &GlobalOpts,
    skip: &SkipOpts,
    host: &Host,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
    prompt: Arc<dyn Prompt>,
    interrupted: &AtomicBool,
) -> Result<()> {
    log.info(&format!("provision {}", super::version_string()));
    if global.dry_run {
        log.info("dry run: no changes will be made");
    }
    let features = skip.feature_set();
    let skipped: Vec<&str> = features.skipped().map(Feature::skip_flag).collect();
    if !skipped.is_empty() {
        log.info(&format!("skipping: {}", skipped.join(" ")));
    }

    let ctx = match prepare(global, host, log, executor, prompt, features) {
        Ok(ctx) => ctx,
        Err(e) => {
            log.error(&format!("{e:#}"));
            return Err(e);
        }
    };
    tasks::run_all(&tasks::all_install_tasks(), &ctx, interrupted);

    let errors = log.error_count();
    if errors > 0 {
        anyhow::bail!("{errors} error(s) during install");
    }
    Ok(())
}

/// Preflight checks and configuration load, ending in a ready [`Context`].
fn prepare(
    global: &GlobalOpts,
    host: &Host,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
    prompt: Arc<dyn Prompt>,
    features: FeatureSet,
) -> Result<Context> {
    log.stage("Checking environment");
    preflight::verify_environment(
        &host.platform,
        executor.as_ref(),
        &**log,
        global.dry_run,
        &features,
        &host.root,
    )?;

    log.stage("Loading configuration");
    let config = Config::load(&host.root, &host.home, features)?;
    log.info(&format!(
        "loaded {} packages, {} groups, {} links",
        config.packages.len(),
        config.groups.len(),
        config.links.len()
    ));

    Ok(Context::new(
        Arc::new(config),
        Arc::clone(log) as Arc<dyn Log>,
        executor,
        prompt,
        global.dry_run,
        global.yes,
    ))
}
