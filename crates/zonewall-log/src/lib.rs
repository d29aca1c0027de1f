// ABOUTME: Shared logging setup for zonewall binaries
// ABOUTME: init() for the daemon and CLI, init_for() to quiet everything but one crate

use tracing_subscriber::EnvFilter;

/// Standard logging to stderr. Default: INFO level, RUST_LOG override.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

/// Crate-filtered logging to stderr. Default: INFO for the named crate, WARN for everything else.
/// The CLI client uses this so only daemon-facing messages show up.
pub fn init_for(crate_name: &str) {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if let Some(directive) = crate_directive(crate_name) {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// None when the name cannot form a target filter; the WARN default then applies to it too.
fn crate_directive(crate_name: &str) -> Option<tracing_subscriber::filter::Directive> {
    // Cargo package names use dashes, tracing targets use underscores.
    let target = crate_name.replace('-', "_");
    format!("{target}=info").parse().ok()
}
