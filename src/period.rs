// === Module Header (agents-tooling) START ===
// purpose: Expand a (start, end) date pair into the ordered sequence of monthly period tokens
// role: periods/expander
// inputs: Two chrono::NaiveDate bounds (only year and month are read)
// outputs: Vec<PeriodId>, one per calendar month, rendered as YYYYMM
// invariants:
// - Output is chronological and free of duplicates; lexicographic order of tokens matches it
// - December rolls into January of the following year
// - start > end yields an empty sequence (callers validate first)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Highest year a four-digit token can carry.
pub const MAX_YEAR: i32 = 9999;

/// A calendar month identified by `YYYYMM`.
///
/// Field order matters: the derived `Ord` compares year first, then month,
/// which is the same order the rendered tokens sort in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodId {
  year: i32,
  month: u32,
}

impl PeriodId {
  /// Returns `None` when the year does not fit four digits or the month is outside 1..=12.
  pub fn new(year: i32, month: u32) -> Option<Self> {
    if !(0..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
      return None;
    }
    Some(Self { year, month })
  }

  pub fn from_date(date: NaiveDate) -> Option<Self> {
    Self::new(date.year(), date.month())
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> u32 {
    self.month
  }

  /// The following calendar month, or `None` past December 9999.
  pub fn next(&self) -> Option<Self> {
    let (y, m) = if self.month == 12 { (self.year + 1, 1) } else { (self.year, self.month + 1) };
    Self::new(y, m)
  }

  // Months since year 0, used for span arithmetic.
  fn ordinal(&self) -> i64 {
    i64::from(self.year) * 12 + i64::from(self.month) - 1
  }
}

impl fmt::Display for PeriodId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}{:02}", self.year, self.month)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid period token {0:?}, expected YYYYMM")]
pub struct ParsePeriodError(pub String);

impl FromStr for PeriodId {
  type Err = ParsePeriodError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bad = || ParsePeriodError(s.to_string());

    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(bad());
    }
    let y: i32 = s[..4].parse().map_err(|_| bad())?;
    let m: u32 = s[4..].parse().map_err(|_| bad())?;

    Self::new(y, m).ok_or_else(bad)
  }
}

impl Serialize for PeriodId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for PeriodId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// Expand `[start, end]` into one period per calendar month, inclusive on both ends.
///
/// Dates whose year cannot be rendered as four digits, or a `start` after `end`,
/// produce an empty vector; [`crate::query::build_query`] rejects both before
/// this is reached.
pub fn expand_periods(start: NaiveDate, end: NaiveDate) -> Vec<PeriodId> {
  let (Some(first), Some(last)) = (PeriodId::from_date(start), PeriodId::from_date(end)) else {
    return Vec::new();
  };

  if first > last {
    return Vec::new();
  }

  let span = (last.ordinal() - first.ordinal() + 1) as usize;
  let mut out = Vec::with_capacity(span);
  let mut cursor = Some(first);

  while let Some(p) = cursor {
    if p > last {
      break;
    }
    out.push(p);
    cursor = p.next();
  }

  out
}
