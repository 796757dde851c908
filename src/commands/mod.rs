//! Top-level subcommand handlers.
pub mod completions;
pub mod install;
pub mod version;

/// Version string, preferring the one stamped at build time.
#[must_use]
pub fn version_string() -> &'static str {
    option_env!("PROVISION_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
