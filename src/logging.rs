//! Logger setup.
//!
//! The editor and player own the terminal, so log lines either go to a file
//! or are kept to warnings and above on stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;

use log::LevelFilter;

/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "pike_engine::codec=debug"). `RUST_LOG` is used when it is unset.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub log_file: Option<PathBuf>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if config.log_file.is_some() {
            builder.filter_level(LevelFilter::Info);
        } else {
            builder.filter_level(LevelFilter::Warn);
        }

        let mut file_error = None;
        if let Some(path) = &config.log_file {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                    builder.write_style(env_logger::WriteStyle::Never);
                }
                Err(e) => file_error = Some(e),
            }
        }

        builder.init();

        if let (Some(path), Some(e)) = (&config.log_file, file_error) {
            log::warn!("cannot open log file {}: {e}; logging to stderr", path.display());
        }
        log::debug!("logging initialized");
    });
}
