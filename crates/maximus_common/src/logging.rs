//! Tracing setup shared by Maximus binaries.
//!
//! Filter comes from `$MAXIMUS_LOG` (tracing `EnvFilter` syntax). Without it
//! the level is `info`, or `debug` when verbose output was requested.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MAXIMUS_LOG";

/// Default filter directive for a verbosity flag
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Build the filter: `$MAXIMUS_LOG` wins over the verbosity default
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
