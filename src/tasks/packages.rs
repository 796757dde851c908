//! Core package install and the AUR helper.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::features::Feature;
use crate::exec::display_command;
use crate::logging::Counter;
use crate::resources::package::{
    PackageManager, PackageResource, batch_install_packages, get_installed_packages,
};
use crate::resources::{Applicable as _, ResourceState};

/// AUR helper binary.
pub const AUR_HELPER: &str = "paru";

/// Git URL of the prebuilt AUR helper package.
const AUR_HELPER_REPO: &str = "https://aur.archlinux.org/paru-bin.git";

/// Default number of parallel jobs for makepkg if nproc detection fails.
const DEFAULT_NPROC: &str = "4";

/// Install the packages in `names` that are not installed yet.
///
/// Queries installed packages **once**, then installs the missing ones in a
/// single batch. If the batch fails each package is retried on its own so one
/// bad name does not block the rest; every individual failure is logged as an
/// error.
pub(super) fn install_missing(
    ctx: &Context,
    manager: PackageManager,
    names: &[String],
) -> Result<TaskResult> {
    ctx.log.debug(&format!(
        "batch-checking {} packages with a single query",
        names.len()
    ));
    let installed = get_installed_packages(ctx.executor.as_ref())?;

    let mut stats = TaskStats::new();
    let mut missing = Vec::new();
    for name in names {
        let resource = PackageResource::new(name.clone(), manager, ctx.executor.as_ref());
        match resource.state_from_installed(&installed) {
            ResourceState::Correct => {
                ctx.log.debug(&format!("ok: {}", resource.description()));
                stats.already_ok += 1;
            }
            _ => missing.push(resource),
        }
    }
    ctx.log.tally(Counter::PackagesSkipped, stats.already_ok);

    if missing.is_empty() {
        return Ok(stats.finish(ctx));
    }

    if ctx.dry_run {
        let names: Vec<&str> = missing.iter().map(|r| r.name.as_str()).collect();
        let (program, args) = manager.install_command(&names);
        ctx.log.dry_run(&display_command(program, &args));
        stats.changed = u32::try_from(missing.len()).unwrap_or(u32::MAX);
        return Ok(stats.finish(ctx));
    }

    let refs: Vec<&PackageResource<'_>> = missing.iter().collect();
    match batch_install_packages(&refs) {
        Ok(()) => {
            stats.changed = u32::try_from(missing.len()).unwrap_or(u32::MAX);
        }
        Err(e) => {
            ctx.log
                .warn(&format!("batch install failed, retrying one by one: {e:#}"));
            for resource in &missing {
                match resource.apply() {
                    Ok(_) => {
                        ctx.log.info(&format!("installed {}", resource.description()));
                        stats.changed += 1;
                    }
                    Err(e) => {
                        ctx.log.error(&format!(
                            "failed to install {}: {e:#}",
                            resource.description()
                        ));
                        stats.failed += 1;
                    }
                }
            }
        }
    }
    ctx.log.tally(Counter::PackagesInstalled, stats.changed);

    Ok(stats.finish(ctx))
}

/// Install the core package list with pacman.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.config.packages.is_empty() {
            return Ok(TaskResult::Skipped("no packages to install".to_string()));
        }
        install_missing(ctx, PackageManager::Pacman, &ctx.config.packages)
    }
}

/// Install the AUR helper (paru) from source.
#[derive(Debug)]
pub struct InstallAurHelper;

impl Task for InstallAurHelper {
    fn name(&self) -> &'static str {
        "Install AUR helper"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.enabled(Feature::AurExtras) {
            return Ok(TaskResult::Skipped(
                Feature::AurExtras.skip_flag().to_string(),
            ));
        }

        if ctx.executor.which(AUR_HELPER) {
            ctx.log.info(&format!("{AUR_HELPER} already installed"));
            return Ok(TaskResult::Ok);
        }

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("git clone {AUR_HELPER_REPO} <build dir>/paru-bin"));
            ctx.log.dry_run("makepkg -si --noconfirm (in <build dir>/paru-bin)");
            return Ok(TaskResult::DryRun);
        }

        let build_dir = ctx.workdir()?.join("paru-bin");
        let build_dir_str = build_dir.to_string_lossy();
        ctx.run_or_preview("git", &["clone", AUR_HELPER_REPO, &build_dir_str])
            .context("cloning paru-bin from AUR")?;

        let nproc = ctx.executor.run("nproc", &[]).map_or_else(
            |_| DEFAULT_NPROC.to_string(),
            |r| r.stdout.trim().to_string(),
        );
        let makeflags = format!("-j{nproc}");
        ctx.log.debug(&format!("building with MAKEFLAGS={makeflags}"));
        ctx.run_in_or_preview(
            &build_dir,
            "makepkg",
            &["-si", "--noconfirm"],
            &[("MAKEFLAGS", &makeflags)],
        )
        .context("building paru with makepkg")?;

        if ctx.executor.which(AUR_HELPER) {
            ctx.log.info(&format!("{AUR_HELPER} installed"));
        } else {
            ctx.log.warn(&format!(
                "{AUR_HELPER} built but not found on PATH; AUR groups will be skipped"
            ));
        }
        Ok(TaskResult::Ok)
    }
}
