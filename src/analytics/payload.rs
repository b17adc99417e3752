// === Module Header (agents-tooling) START ===
// purpose: Validate a raw analytics response at the boundary and convert it into a typed ReportResult
// role: analytics/payload
// inputs: serde_json::Value as returned by the analytics endpoint
// outputs: ReportResult with one ReportRow per 4-cell row, plus metaData display names
// invariants:
// - Every row has exactly four scalar cells (strings, or numbers rendered as text)
// - A missing or non-array `rows` is a payload error; an empty array is a valid empty report
// errors: FetchError::Payload naming the offending row/cell
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::FetchError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{ReportResult, ReportRow};

const ROW_ARITY: usize = 4;

fn cell_text(row_idx: usize, col_idx: usize, cell: &Value) -> Result<String, FetchError> {
  match cell {
    Value::String(s) => Ok(s.clone()),
    Value::Number(n) => Ok(n.to_string()),
    other => Err(FetchError::Payload(format!(
      "row {row_idx} cell {col_idx} is not a string or number: {other}"
    ))),
  }
}

fn parse_row(idx: usize, raw: &Value) -> Result<ReportRow, FetchError> {
  let Some(cells) = raw.as_array() else {
    return Err(FetchError::Payload(format!("row {idx} is not an array")));
  };

  if cells.len() != ROW_ARITY {
    return Err(FetchError::Payload(format!(
      "row {idx} has {} cells, expected {ROW_ARITY}",
      cells.len()
    )));
  }

  Ok(ReportRow {
    data_element: cell_text(idx, 0, &cells[0])?,
    org_unit: cell_text(idx, 1, &cells[1])?,
    period: cell_text(idx, 2, &cells[2])?,
    value: cell_text(idx, 3, &cells[3])?,
  })
}

fn item_names(payload: &Value) -> BTreeMap<String, String> {
  let Some(items) = payload.fetch("metaData.items").value().and_then(Value::as_object) else {
    return BTreeMap::new();
  };

  items
    .iter()
    .filter_map(|(id, item)| item.fetch("name").to::<String>().map(|name| (id.clone(), name)))
    .collect()
}

/// Turn an analytics response body into a [`ReportResult`].
pub fn parse_report(payload: &Value) -> Result<ReportResult, FetchError> {
  let rows = payload
    .fetch("rows")
    .value()
    .and_then(Value::as_array)
    .ok_or_else(|| FetchError::Payload("response has no rows array".into()))?;

  let rows = rows
    .iter()
    .enumerate()
    .map(|(i, r)| parse_row(i, r))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(ReportResult {
    rows,
    names: item_names(payload),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn parses_rows_and_names() {
    let payload = json!({
      "headers": [{"name": "dx"}, {"name": "ou"}, {"name": "pe"}, {"name": "value"}],
      "rows": [["DE1", "OU1", "202301", "10"], ["DE1", "OU1", "202302", 12.5]],
      "metaData": { "items": { "OU1": { "name": "Bo" }, "202301": { "name": "January 2023" }, "junk": 3 } }
    });

    let result = parse_report(&payload).unwrap();
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].value, "10");
    assert_eq!(result.rows[1].value, "12.5");
    assert_eq!(result.names.get("OU1").map(String::as_str), Some("Bo"));
    assert!(!result.names.contains_key("junk"));
  }

  #[test]
  fn empty_rows_is_an_empty_report() {
    let result = parse_report(&json!({ "rows": [] })).unwrap();
    assert!(result.rows.is_empty());
    assert!(result.names.is_empty());
  }

  #[test]
  fn missing_rows_is_a_payload_error() {
    let err = parse_report(&json!({ "status": "ERROR" })).unwrap_err();
    assert!(matches!(err, FetchError::Payload(_)));
  }

  #[test]
  fn wrong_arity_is_rejected() {
    let err = parse_report(&json!({ "rows": [["DE1", "OU1", "202301"]] })).unwrap_err();
    assert_eq!(err, FetchError::Payload("row 0 has 3 cells, expected 4".into()));
  }

  #[test]
  fn non_scalar_cell_is_rejected() {
    let err = parse_report(&json!({ "rows": [["DE1", null, "202301", "1"]] })).unwrap_err();
    assert!(err.to_string().contains("row 0 cell 1"));
  }
}
