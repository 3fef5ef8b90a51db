//! `tracing` subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other filter source.
pub const LOG_ENV: &str = "RXT_LOG";

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "rxt_port=debug,rxt_cli=debug";

/// Pick the filter directive: `RXT_LOG`, then `--verbose`, then the config
/// file, then `warn`.
pub fn resolve_filter(env: Option<String>, verbose: bool, configured: Option<&str>) -> String {
    if let Some(env) = env.filter(|s| !s.trim().is_empty()) {
        return env;
    }
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    configured.unwrap_or(DEFAULT_FILTER).to_string()
}

/// Install the global subscriber. Logs go to stderr so stdout only ever
/// carries port output.
pub fn init(verbose: bool, configured: Option<&str>) {
    let directive = resolve_filter(std::env::var(LOG_ENV).ok(), verbose, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_wins() {
        let f = resolve_filter(Some("trace".into()), true, Some("info"));
        assert_eq!(f, "trace");
    }

    #[test]
    fn blank_env_is_ignored() {
        let f = resolve_filter(Some("  ".into()), false, Some("info"));
        assert_eq!(f, "info");
    }

    #[test]
    fn verbose_beats_config() {
        assert_eq!(resolve_filter(None, true, Some("error")), VERBOSE_FILTER);
    }

    #[test]
    fn falls_back_to_warn() {
        assert_eq!(resolve_filter(None, false, None), "warn");
    }
}
