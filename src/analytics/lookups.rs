// === Module Header (agents-tooling) START ===
// purpose: Typed wrappers over the lookup endpoints feeding the program and org unit pickers
// role: analytics/lookups
// inputs: An AnalyticsApi backend; page size for programs
// outputs: Vec<Program>, Vec<OrgUnit>
// invariants: A response without the expected list is a payload error, never an empty list
// errors: FetchError (transport/status from the backend, Payload for shape problems)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::analytics::api::AnalyticsApi;
use crate::error::FetchError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{OrgUnit, Program};

fn typed_list<T: serde::de::DeserializeOwned>(payload: &serde_json::Value, key: &str) -> Result<Vec<T>, FetchError> {
  let list = payload.fetch(key);

  let Some(v) = list.value().filter(|_| list.is_present()) else {
    return Err(FetchError::Payload(format!("response has no {key} array")));
  };

  serde_json::from_value::<Vec<T>>(v.clone()).map_err(|e| FetchError::Payload(format!("{key}: {e}")))
}

pub fn load_programs(api: &dyn AnalyticsApi, page_size: u32) -> Result<Vec<Program>, FetchError> {
  typed_list(&api.list_programs_json(page_size)?, "programs")
}

/// Top-level (level 1) organisation units.
pub fn load_org_units(api: &dyn AnalyticsApi) -> Result<Vec<OrgUnit>, FetchError> {
  typed_list(&api.list_org_units_json()?, "organisationUnits")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::query::ReportQuery;
  use serde_json::{json, Value};

  struct Fixed(Value);

  impl AnalyticsApi for Fixed {
    fn list_programs_json(&self, _page_size: u32) -> Result<Value, FetchError> {
      Ok(self.0.clone())
    }

    fn list_org_units_json(&self) -> Result<Value, FetchError> {
      Ok(self.0.clone())
    }

    fn fetch_analytics_json(&self, _query: &ReportQuery) -> Result<Value, FetchError> {
      Ok(json!({ "rows": [] }))
    }
  }

  #[test]
  fn loads_programs() {
    let api = Fixed(json!({ "pager": { "page": 1 }, "programs": [{ "id": "P1", "displayName": "Malaria focus" }] }));
    let programs = load_programs(&api, 50).unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0].display_name, "Malaria focus");
  }

  #[test]
  fn loads_org_units_with_code() {
    let api = Fixed(json!({ "organisationUnits": [
      { "id": "ImspTQPwCqd", "displayName": "Sierra Leone", "path": "/ImspTQPwCqd", "code": "OU_525" }
    ] }));
    let units = load_org_units(&api).unwrap();
    assert_eq!(units[0].code.as_deref(), Some("OU_525"));
  }

  #[test]
  fn missing_list_key_is_payload_error() {
    let api = Fixed(json!({ "httpStatus": "Unauthorized" }));
    assert!(matches!(load_programs(&api, 50), Err(FetchError::Payload(_))));
  }

  #[test]
  fn malformed_entries_are_payload_errors() {
    let api = Fixed(json!({ "programs": [{ "displayName": "no id" }] }));
    let err = load_programs(&api, 50).unwrap_err();
    assert!(err.to_string().contains("programs"));
  }
}
