//! Diagnostic log output.
//!
//! Logs go to stderr so they never mix with listing output or a flattened
//! document written to stdout. `RUST_LOG` takes precedence over `--verbose`.

use tracing_subscriber::EnvFilter;

/// Crates whose debug output `--verbose` enables.
const CRATES: &[&str] = &[
    "imdclude",
    "imdclude_cli",
    "imdclude_document",
    "imdclude_backup",
];

/// Builds the default filter directives for the given verbosity.
pub fn default_directives(verbose: bool) -> String {
    if !verbose {
        return "warn".to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|c| format!("{c}=debug")));
    directives.join(",")
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
