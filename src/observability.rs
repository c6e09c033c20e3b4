//! Logging setup for the merlin column layer.
//!
//! Library code only talks to the `log` facade. Applications that want to see
//! what the registry and selectors are doing call `enable_verbose_logging` (or
//! `init_from_config`) once, which installs an `env_logger` backend.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::config::MerlinConfig;
use crate::error::MerlinError;

static INIT_LOGGER: Once = Once::new();

/// Turns on `info` level logging, optionally appending to `log_file`.
///
/// Only the first successful call has an effect; later calls return `Ok(())`
/// without touching the installed logger. A log file that can't be opened is
/// reported and leaves logging uninstalled, so a later call can still set it up.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), MerlinError> {
    install_once(&INIT_LOGGER, log_file)
}

fn install_once(once: &Once, log_file: Option<&Path>) -> Result<(), MerlinError> {
    if once.is_completed() {
        return Ok(());
    }
    // Opened before `call_once` so a bad path doesn't use up the `Once`.
    let file = match log_file {
        Some(filename) => Some(OpenOptions::new().append(true).create(true).open(filename)?),
        None => None,
    };

    once.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

/// Applies the logging part of `config`.
pub fn init_from_config(config: &MerlinConfig) -> Result<(), MerlinError> {
    if !config.verbose_logging {
        return Ok(());
    }
    enable_verbose_logging(config.log_file.as_deref().map(Path::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_a_no_op() {
        let config = MerlinConfig::default();
        assert!(init_from_config(&config).is_ok());
    }

    #[test]
    fn test_enable_twice_is_harmless() {
        assert!(enable_verbose_logging(None).is_ok());
        assert!(enable_verbose_logging(None).is_ok());
        log::info!("verbose logging enabled in test");
    }

    #[test]
    fn test_unopenable_log_file_leaves_setup_available() {
        let once = Once::new();
        let bad = std::env::temp_dir()
            .join("merlin-columns-no-such-dir")
            .join("nested")
            .join("verbose.log");

        let err = install_once(&once, Some(&bad)).unwrap_err();
        assert!(matches!(err, MerlinError::Io(_)));
        assert!(!once.is_completed());

        assert!(install_once(&once, None).is_ok());
        assert!(once.is_completed());
    }
}
