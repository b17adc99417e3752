//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Events go to stderr so stdout stays reserved for the report JSON.
//!
//! - `warn`: rejected selections, failed requests
//! - `info`: request dispatch and completion
//! - `debug`: HTTP targets, stale completions being dropped
//! - `trace`: everything else
//!
//! `RUST_LOG` overrides the level derived from `-v`.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
  #[default]
  Compact,
  Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
  pub level: Level,
  pub format: LogFormat,
}

impl LogConfig {
  /// 0 → warn, 1 → info, 2 → debug, 3+ → trace.
  pub fn from_verbosity(verbosity: u8) -> Self {
    let level = match verbosity {
      0 => Level::WARN,
      1 => Level::INFO,
      2 => Level::DEBUG,
      _ => Level::TRACE,
    };
    Self {
      level,
      format: LogFormat::default(),
    }
  }

  pub fn with_format(mut self, format: LogFormat) -> Self {
    self.format = format;
    self
  }

  fn filter(&self) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
  }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
  let builder = fmt().with_env_filter(config.filter()).with_writer(std::io::stderr).with_target(false);

  let res = match config.format {
    LogFormat::Compact => builder.compact().try_init(),
    LogFormat::Json => builder.json().try_init(),
  };

  res.map_err(|e| anyhow!("initializing logging: {e}"))
}
