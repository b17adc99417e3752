// === Module Header (agents-tooling) START ===
// purpose: Host loop for the command line: run a lookup or generate one report and print it
// role: processing/runner
// inputs: EffectiveConfig, an AnalyticsApi backend
// outputs: JSON on stdout or in --out
// side_effects: Network calls through the backend; writes output
// invariants:
// - A rejected selection exits non-zero before any request is made
// - The report is printed only from a settled Success state
// errors: Validation, fetch failure and timeout surface as anyhow errors with the underlying message
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use crate::analytics::api::AnalyticsApi;
use crate::analytics::lookups::{load_org_units, load_programs};
use crate::cli::{EffectiveConfig, Lookup};
use crate::model::FetchState;
use crate::orchestrator::ReportOrchestrator;
use crate::render::{report_document, write_json};

pub fn run(cfg: &EffectiveConfig, api: Arc<dyn AnalyticsApi>) -> Result<()> {
  match cfg.list {
    Some(Lookup::Programs) => write_json(&cfg.out, &load_programs(api.as_ref(), cfg.api.page_size)?),
    Some(Lookup::OrgUnits) => write_json(&cfg.out, &load_org_units(api.as_ref())?),
    None => run_report(cfg, api),
  }
}

pub fn run_report(cfg: &EffectiveConfig, api: Arc<dyn AnalyticsApi>) -> Result<()> {
  let mut orchestrator = ReportOrchestrator::new(api);
  let dispatched = orchestrator.generate(&cfg.selection)?;

  let state = orchestrator.wait_settled(cfg.wait);
  info!(seq = dispatched.seq, state = state.label(), "report settled");

  match state {
    FetchState::Success(result) => write_json(&cfg.out, &report_document(&dispatched.query, result, cfg.labels)),
    FetchState::Failure(msg) => bail!("report request failed: {msg}"),
    FetchState::Loading => bail!(
      "no response from the analytics server after {}s",
      cfg.wait.as_secs()
    ),
    FetchState::Idle => bail!("report request was never dispatched"),
  }
}
