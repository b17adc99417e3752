// === Module Header (agents-tooling) START ===
// purpose: Define the report, lookup and fetch-state types shared by the orchestrator, API layer and output
// role: model/types
// outputs: Serializable structs with stable camelCase field names
// invariants: ReportRow always carries exactly the four positional cells of an analytics row
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::period::PeriodId;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
  pub data_element: String,
  pub org_unit: String,
  pub period: String,
  pub value: String,
}

/// Rows of an analytics response, plus any display names the backend sent along.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ReportResult {
  pub rows: Vec<ReportRow>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub names: BTreeMap<String, String>,
}

impl ReportResult {
  /// Rows with ids swapped for display names where the backend provided one.
  pub fn labelled_rows(&self) -> Vec<ReportRow> {
    let label = |id: &str| self.names.get(id).cloned().unwrap_or_else(|| id.to_string());

    self
      .rows
      .iter()
      .map(|r| ReportRow {
        data_element: label(&r.data_element),
        org_unit: label(&r.org_unit),
        period: label(&r.period),
        value: r.value.clone(),
      })
      .collect()
  }
}

/// Lifecycle of the most recent report request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
  #[default]
  Idle,
  Loading,
  Success(ReportResult),
  Failure(String),
}

impl FetchState {
  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Loading)
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Idle => "idle",
      Self::Loading => "loading",
      Self::Success(_) => "success",
      Self::Failure(_) => "failure",
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
  pub id: String,
  pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
  pub id: String,
  pub display_name: String,
  #[serde(default)]
  pub path: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
  pub program_id: String,
  pub org_unit_id: String,
  pub periods: Vec<PeriodId>,
  pub count: usize,
}

/// What the command-line host prints for a successful report.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
  pub summary: ReportSummary,
  pub rows: Vec<ReportRow>,
}
