//! Diagnostic logging bootstrap
//!
//! Diagnostics (skipped rows, failed pushes, unparseable dates) go through
//! the `log` facade to stderr so they never mix with command output on
//! stdout. The audit trail of data changes is separate, see [`crate::audit`].

use flexi_logger::{Logger, LoggerHandle};

use crate::error::{BudgetError, BudgetResult};

/// Environment variable holding the log specification (e.g. `info`,
/// `warn,fortnight_cli::sync=debug`)
pub const LOG_ENV: &str = "FORTNIGHT_LOG";

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "info";

/// Pick the log specification: the environment wins over `--verbose`
pub fn resolve_spec(env_spec: Option<String>, verbose: bool) -> String {
    match env_spec {
        Some(spec) if !spec.trim().is_empty() => spec.trim().to_string(),
        _ if verbose => VERBOSE_LEVEL.to_string(),
        _ => DEFAULT_LEVEL.to_string(),
    }
}

/// Start logging to stderr
///
/// The returned handle must be kept alive for the rest of the process.
pub fn init_logging(verbose: bool) -> BudgetResult<LoggerHandle> {
    let spec = resolve_spec(std::env::var(LOG_ENV).ok(), verbose);

    Logger::try_with_str(&spec)
        .map_err(|e| BudgetError::Config(format!("Invalid {} value '{}': {}", LOG_ENV, spec, e)))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|e| BudgetError::Config(format!("Failed to start logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_spec() {
        assert_eq!(resolve_spec(None, false), "warn");
        assert_eq!(resolve_spec(None, true), "info");
        assert_eq!(resolve_spec(Some("  ".into()), true), "info");
        assert_eq!(resolve_spec(Some("debug".into()), false), "debug");
        assert_eq!(resolve_spec(Some("error".into()), true), "error");
    }
}
