// === Module Header (agents-tooling) START ===
// purpose: Typed errors for selection validation and analytics/lookup calls
// role: errors/taxonomy
// outputs: SelectionField, ValidationError, FetchError
// invariants:
// - ValidationError is raised synchronously while a query is built and never reaches the network
// - FetchError messages are what FetchState::Failure carries
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// The four user-chosen inputs, named the way they appear on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionField {
  Program,
  OrgUnit,
  StartDate,
  EndDate,
}

impl SelectionField {
  pub fn wire_name(&self) -> &'static str {
    match self {
      Self::Program => "programId",
      Self::OrgUnit => "orgUnitId",
      Self::StartDate => "startDate",
      Self::EndDate => "endDate",
    }
  }
}

impl fmt::Display for SelectionField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.wire_name())
  }
}

/// A selection that cannot be turned into a report query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("missing required field: {0}")]
  Missing(SelectionField),

  #[error("invalid date range: startDate {start} is after endDate {end}")]
  InvertedRange { start: NaiveDate, end: NaiveDate },

  #[error("invalid {field}: year {year} does not fit a four-digit period")]
  YearOutOfRange { field: SelectionField, year: i32 },

  #[error("date range expands to no periods")]
  NoPeriods,
}

impl ValidationError {
  /// The selection fields this error is about, in validation order.
  pub fn fields(&self) -> Vec<SelectionField> {
    match self {
      Self::Missing(f) | Self::YearOutOfRange { field: f, .. } => vec![*f],
      Self::InvertedRange { .. } | Self::NoPeriods => vec![SelectionField::StartDate, SelectionField::EndDate],
    }
  }
}

/// A failed call to the analytics backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// Connection, DNS, TLS or timeout failure. Displays the underlying message unchanged.
  #[error("{0}")]
  Transport(String),

  #[error("analytics request failed with HTTP status {0}")]
  Status(u16),

  /// The response body was not the shape we expect.
  #[error("malformed analytics payload: {0}")]
  Payload(String),
}

impl From<ureq::Error> for FetchError {
  fn from(err: ureq::Error) -> Self {
    match err {
      ureq::Error::StatusCode(code) => Self::Status(code),
      ureq::Error::Json(e) => Self::Payload(e.to_string()),
      other => Self::Transport(other.to_string()),
    }
  }
}
