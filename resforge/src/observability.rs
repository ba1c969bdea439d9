//! Logging setup
//!
//! The library only emits `tracing` events; binaries call [`init`] once to
//! install a subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human readable lines
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` for resforge
/// targets when `verbose` is true.
///
/// # Example
///
/// ```rust,no_run
/// use resforge::observability::{self, LogFormat};
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(false, LogFormat::Compact)?;
/// tracing::info!("generation started");
/// # Ok(())
/// # }
/// ```
pub fn init(verbose: bool, format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,resforge=debug,resforge_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
