// === Module Header (agents-tooling) START ===
// purpose: Validate a Selection and assemble the analytics query descriptor
// role: query/builder
// inputs: Selection snapshot
// outputs: ReportQuery (program, org unit, non-empty chronological periods) or ValidationError
// invariants:
// - Validation order: programId -> orgUnitId -> startDate -> endDate -> ordering -> year range
// - A ReportQuery can only be built through validation; periods are sorted and deduplicated
// errors: ValidationError, synchronous, never touches the network
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{SelectionField, ValidationError};
use crate::period::{expand_periods, PeriodId, MAX_YEAR};
use crate::selection::Selection;

/// What the analytics endpoint is asked for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
  program_id: String,
  org_unit_id: String,
  periods: Vec<PeriodId>,
}

impl ReportQuery {
  fn new(program_id: String, org_unit_id: String, mut periods: Vec<PeriodId>) -> Result<Self, ValidationError> {
    periods.sort_unstable();
    periods.dedup();

    if periods.is_empty() {
      return Err(ValidationError::NoPeriods);
    }

    Ok(Self {
      program_id,
      org_unit_id,
      periods,
    })
  }

  pub fn program_id(&self) -> &str {
    &self.program_id
  }

  pub fn org_unit_id(&self) -> &str {
    &self.org_unit_id
  }

  pub fn periods(&self) -> &[PeriodId] {
    &self.periods
  }

  /// Periods joined the way the analytics dimension expects them: `202301;202302`.
  pub fn period_dimension(&self) -> String {
    self.periods.iter().map(ToString::to_string).collect::<Vec<_>>().join(";")
  }
}

fn check_year(field: SelectionField, date: NaiveDate) -> Result<(), ValidationError> {
  let year = date.year();

  if (0..=MAX_YEAR).contains(&year) {
    Ok(())
  } else {
    Err(ValidationError::YearOutOfRange { field, year })
  }
}

/// Validate `selection` and build the query for it.
pub fn build_query(selection: &Selection) -> Result<ReportQuery, ValidationError> {
  let program = selection.program().ok_or(ValidationError::Missing(SelectionField::Program))?;
  let org_unit = selection.org_unit().ok_or(ValidationError::Missing(SelectionField::OrgUnit))?;
  let start = selection.start_date.ok_or(ValidationError::Missing(SelectionField::StartDate))?;
  let end = selection.end_date.ok_or(ValidationError::Missing(SelectionField::EndDate))?;

  if start > end {
    return Err(ValidationError::InvertedRange { start, end });
  }

  check_year(SelectionField::StartDate, start)?;
  check_year(SelectionField::EndDate, end)?;

  ReportQuery::new(program.to_string(), org_unit.to_string(), expand_periods(start, end))
}
