// === Module Header (agents-tooling) START ===
// purpose: Hold the user's program / org unit / date choices and hand out immutable snapshots
// role: state/selection
// inputs: Independent setter calls from the presentation layer, in any order
// outputs: Selection values consumed by the query builder
// invariants: Setters never validate; partially filled selections are legal until generate-time
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An immutable snapshot of the four report inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
  pub program_id: Option<String>,
  pub org_unit_id: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
}

impl Selection {
  pub fn with_program(mut self, id: impl Into<String>) -> Self {
    self.program_id = Some(id.into());
    self
  }

  pub fn with_org_unit(mut self, id: impl Into<String>) -> Self {
    self.org_unit_id = Some(id.into());
    self
  }

  pub fn with_start_date(mut self, date: NaiveDate) -> Self {
    self.start_date = Some(date);
    self
  }

  pub fn with_end_date(mut self, date: NaiveDate) -> Self {
    self.end_date = Some(date);
    self
  }

  /// Program id, treating blank strings as unset.
  pub fn program(&self) -> Option<&str> {
    non_blank(self.program_id.as_deref())
  }

  /// Org unit id, treating blank strings as unset.
  pub fn org_unit(&self) -> Option<&str> {
    non_blank(self.org_unit_id.as_deref())
  }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}

/// Mutable holder the UI writes into; [`SelectionStore::snapshot`] freezes it.
#[derive(Debug, Default)]
pub struct SelectionStore {
  current: Selection,
}

impl SelectionStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_program(&mut self, id: impl Into<String>) {
    self.current.program_id = Some(id.into());
  }

  pub fn clear_program(&mut self) {
    self.current.program_id = None;
  }

  pub fn set_org_unit(&mut self, id: impl Into<String>) {
    self.current.org_unit_id = Some(id.into());
  }

  pub fn clear_org_unit(&mut self) {
    self.current.org_unit_id = None;
  }

  pub fn set_start_date(&mut self, date: NaiveDate) {
    self.current.start_date = Some(date);
  }

  pub fn clear_start_date(&mut self) {
    self.current.start_date = None;
  }

  pub fn set_end_date(&mut self, date: NaiveDate) {
    self.current.end_date = Some(date);
  }

  pub fn clear_end_date(&mut self) {
    self.current.end_date = None;
  }

  pub fn snapshot(&self) -> Selection {
    self.current.clone()
  }
}
