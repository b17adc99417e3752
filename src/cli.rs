use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::config::{discover_token, resolve_base_url, ApiSettings, DEFAULT_PAGE_SIZE};
use crate::selection::{Selection, SelectionStore};
use crate::util;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Lookup {
  Programs,
  OrgUnits,
}

#[derive(Parser, Debug)]
#[command(
    name = "analytics-report-builder",
    version,
    about = "Fetch a monthly analytics report for a program and organisation unit",
    long_about = None
)]
pub struct Cli {
  /// Program id to report on
  #[arg(long)]
  pub program: Option<String>,

  /// Organisation unit id to report on
  #[arg(long)]
  pub org_unit: Option<String>,

  /// First day of the range: YYYY-MM-DD, or YYYY-MM for the first of that month
  #[arg(long, alias = "since")]
  pub start: Option<String>,

  /// Last day of the range (inclusive): YYYY-MM-DD or YYYY-MM
  #[arg(long, alias = "until")]
  pub end: Option<String>,

  /// List lookup values instead of building a report
  #[arg(long, value_enum)]
  pub list: Option<Lookup>,

  /// Analytics server root URL (falls back to ARB_BASE_URL)
  #[arg(long)]
  pub base_url: Option<String>,

  /// Personal access token (falls back to ARB_API_TOKEN)
  #[arg(long)]
  pub token: Option<String>,

  /// Overall HTTP timeout per request, in seconds (default: none)
  #[arg(long)]
  pub timeout_secs: Option<u64>,

  /// Page size for the program lookup
  #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
  pub page_size: u32,

  /// How long to wait for the report before giving up, in seconds
  #[arg(long, default_value_t = 120)]
  pub wait_secs: u64,

  /// Output file path ("-" for stdout)
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Show display names instead of ids where the server provides them
  #[arg(long)]
  pub labels: bool,

  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Emit logs as JSON lines on stderr
  #[arg(long)]
  pub log_json: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Serialize)]
pub struct EffectiveConfig {
  pub selection: Selection,
  pub list: Option<Lookup>,
  pub api: ApiSettings,
  pub wait: Duration,
  pub out: String,
  pub labels: bool,
}

/// Turn parsed flags into the selection and settings the run uses.
///
/// Unset report flags stay unset: the query builder reports what is missing.
pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let mut store = SelectionStore::new();

  if let Some(p) = &cli.program {
    store.set_program(p.as_str());
  }
  if let Some(ou) = &cli.org_unit {
    store.set_org_unit(ou.as_str());
  }
  if let Some(s) = &cli.start {
    store.set_start_date(util::parse_date_bound(s).context("parsing --start")?);
  }
  if let Some(e) = &cli.end {
    store.set_end_date(util::parse_date_bound(e).context("parsing --end")?);
  }

  let api = ApiSettings {
    base_url: resolve_base_url(cli.base_url.as_deref()),
    token: discover_token(cli.token.as_deref()),
    timeout: cli.timeout_secs.map(Duration::from_secs),
    page_size: cli.page_size,
  };

  Ok(EffectiveConfig {
    selection: store.snapshot(),
    list: cli.list,
    api,
    wait: Duration::from_secs(cli.wait_secs),
    out: cli.out,
    labels: cli.labels,
  })
}
