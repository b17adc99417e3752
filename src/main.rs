use anyhow::Result;
use clap::Parser;

use analytics_report_builder::analytics::api::build_api;
use analytics_report_builder::cli::{normalize, Cli};
use analytics_report_builder::logging::{init_logging, LogConfig, LogFormat};
use analytics_report_builder::{runner, util};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  let format = if cli.log_json { LogFormat::Json } else { LogFormat::Compact };
  init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(format))?;

  // Phase 1: flags -> selection + settings
  let cfg = normalize(cli)?;
  tracing::debug!(config = ?cfg, "effective config");

  // Phase 2: backend
  let api = build_api(&cfg.api)?;

  // Phase 3: lookup or report
  runner::run(&cfg, api)
}
