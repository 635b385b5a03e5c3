//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install a formatting subscriber filtered by `RUST_LOG`, or by the
/// configured `log.level` when `RUST_LOG` is unset.
///
/// Safe to call from every test: once a global subscriber exists, later
/// calls do nothing.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.to_ascii_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        let config = Config::default();
        init(&config);
        init(&config);
    }

    #[test]
    fn unknown_level_does_not_panic() {
        let config = Config {
            log_level: "LOUD!!".to_string(),
            ..Config::default()
        };
        init(&config);
    }
}
