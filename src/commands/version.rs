//! Command: print version information.

/// Print the provision version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("provision {}", super::version_string());
}
