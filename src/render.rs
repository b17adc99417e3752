// === Module Header (agents-tooling) START ===
// purpose: Shape settled report state into the JSON document and write it to stdout or a file
// role: output/render
// inputs: ReportQuery, ReportResult, output target ("-" or path)
// outputs: Pretty JSON on stdout or in the target file
// side_effects: Creates parent directories for file targets
// errors: IO/serialization errors bubble with the target path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{ReportDocument, ReportResult, ReportSummary};
use crate::query::ReportQuery;

pub fn report_document(query: &ReportQuery, result: &ReportResult, labels: bool) -> ReportDocument {
  let rows = if labels { result.labelled_rows() } else { result.rows.clone() };

  ReportDocument {
    summary: ReportSummary {
      program_id: query.program_id().to_string(),
      org_unit_id: query.org_unit_id().to_string(),
      periods: query.periods().to_vec(),
      count: rows.len(),
    },
    rows,
  }
}

/// Write `value` as pretty JSON to stdout (`-`) or to the file at `out`.
pub fn write_json<T: Serialize>(out: &str, value: &T) -> Result<()> {
  let mut bytes = serde_json::to_vec_pretty(value)?;
  bytes.push(b'\n');

  if out == "-" {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    return Ok(stdout.flush()?);
  }

  let out_path = Path::new(out);

  if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  std::fs::write(out_path, bytes).with_context(|| format!("writing {}", out_path.display()))
}
