// === Module Header (agents-tooling) START ===
// purpose: Small helpers: date-bound parsing for flags and man page rendering
// role: utilities/helpers
// inputs: Flag strings; clap CommandFactory
// outputs: chrono::NaiveDate; man page text
// invariants: YYYY-MM means the first day of that month
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::CommandFactory;

/// Parse `YYYY-MM-DD`, or `YYYY-MM` as the first of that month.
pub fn parse_date_bound(raw: &str) -> Result<NaiveDate> {
  let s = raw.trim();

  if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(d);
  }

  let parts: Vec<&str> = s.split('-').collect();

  if parts.len() != 2 {
    bail!("invalid date {raw:?}, expected YYYY-MM-DD or YYYY-MM");
  }
  let y: i32 = parts[0].parse().with_context(|| format!("parsing year in {raw:?}"))?;
  let m: u32 = parts[1].parse().with_context(|| format!("parsing month in {raw:?}"))?;

  NaiveDate::from_ymd_opt(y, m, 1).with_context(|| format!("invalid month in {raw:?}"))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
