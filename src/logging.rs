//! Diagnostic logging.
//!
//! Events go to standard error so they never mix with command output. The
//! filter is read from `FUGU_LOG` using `tracing_subscriber::EnvFilter`
//! directives and defaults to `warn`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "FUGU_LOG";

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error when the directives in `FUGU_LOG` and the fallback are
/// both invalid, or when a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer =
        EnvFilter::try_from_env(LOG_ENV_VAR).or_else(|_| EnvFilter::try_new("warn"))?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn second_init_is_rejected() {
        let first = init();
        assert!(init().is_err(), "only one global subscriber may be installed");
        drop(first);
    }
}
