// === Module Header (agents-tooling) START ===
// purpose: Trait seam and backends for the analytics server (HTTP, env-backed test double, lookup cache)
// role: analytics/api
// inputs: ApiSettings (base URL, token, timeout); ReportQuery; env ARB_TEST_* for the test double
// outputs: Raw JSON payloads for programs, org units and analytics queries
// side_effects: Network calls to the configured server (HTTP backend only)
// invariants:
// - Each fetch_analytics_json call performs exactly one request; analytics responses are never cached
// - Lookup responses are cached per process, successful responses only
// - Backends are Send + Sync so orchestrator workers can share them through an Arc
// errors: FetchError (transport, HTTP status, payload)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::FetchError;
use crate::query::ReportQuery;

pub const ENV_TEST_ANALYTICS_JSON: &str = "ARB_TEST_ANALYTICS_JSON";
pub const ENV_TEST_ANALYTICS_ERROR: &str = "ARB_TEST_ANALYTICS_ERROR";
pub const ENV_TEST_PROGRAMS_JSON: &str = "ARB_TEST_PROGRAMS_JSON";
pub const ENV_TEST_ORG_UNITS_JSON: &str = "ARB_TEST_ORG_UNITS_JSON";

// --- Trait seam for the analytics server ---
pub trait AnalyticsApi: Send + Sync {
  fn list_programs_json(&self, page_size: u32) -> Result<Value, FetchError>;
  fn list_org_units_json(&self) -> Result<Value, FetchError>;
  fn fetch_analytics_json(&self, query: &ReportQuery) -> Result<Value, FetchError>;
}

/// Query parameters for the analytics endpoint, one `dimension` per axis.
pub fn analytics_params(query: &ReportQuery) -> Vec<(&'static str, String)> {
  vec![
    ("dimension", format!("dx:{}", query.program_id())),
    ("dimension", format!("ou:{}", query.org_unit_id())),
    ("dimension", format!("pe:{}", query.period_dimension())),
  ]
}

pub struct HttpAnalyticsApi {
  base_url: String,
  token: Option<String>,
  agent: ureq::Agent,
}

impl HttpAnalyticsApi {
  pub fn new(base_url: String, token: Option<String>, timeout: Option<std::time::Duration>) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder().timeout_global(timeout).build().into();

    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      token,
      agent,
    }
  }

  fn get_json(&self, resource: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
    let url = format!("{}/api/{}", self.base_url, resource);

    let mut req = self
      .agent
      .get(url.as_str())
      .header("Accept", "application/json")
      .header("User-Agent", "analytics-report-builder");

    if let Some(t) = &self.token {
      req = req.header("Authorization", &format!("ApiToken {}", t));
    }

    for (k, v) in params {
      req = req.query(*k, v.as_str());
    }

    debug!(%url, params = params.len(), "GET");

    let mut resp = req.call()?;
    debug!(%url, status = resp.status().as_u16(), "response");

    Ok(resp.body_mut().read_json::<Value>()?)
  }
}

impl AnalyticsApi for HttpAnalyticsApi {
  fn list_programs_json(&self, page_size: u32) -> Result<Value, FetchError> {
    self.get_json(
      "programs",
      &[("pageSize", page_size.to_string()), ("fields", "id,displayName".into())],
    )
  }

  fn list_org_units_json(&self) -> Result<Value, FetchError> {
    self.get_json(
      "organisationUnits",
      &[
        ("fields", "id,displayName,path,code".into()),
        ("filter", "level:eq:1".into()),
        ("paging", "false".into()),
      ],
    )
  }

  fn fetch_analytics_json(&self, query: &ReportQuery) -> Result<Value, FetchError> {
    self.get_json("analytics", &analytics_params(query))
  }
}

/// Test double that serves payloads from `ARB_TEST_*` environment variables.
pub struct EnvAnalyticsApi;

fn env_json(key: &str, default: Value) -> Result<Value, FetchError> {
  match std::env::var(key) {
    Ok(s) => serde_json::from_str::<Value>(&s).map_err(|e| FetchError::Payload(e.to_string())),
    Err(_) => Ok(default),
  }
}

impl AnalyticsApi for EnvAnalyticsApi {
  fn list_programs_json(&self, _page_size: u32) -> Result<Value, FetchError> {
    env_json(ENV_TEST_PROGRAMS_JSON, json!({ "programs": [] }))
  }

  fn list_org_units_json(&self) -> Result<Value, FetchError> {
    env_json(ENV_TEST_ORG_UNITS_JSON, json!({ "organisationUnits": [] }))
  }

  fn fetch_analytics_json(&self, _query: &ReportQuery) -> Result<Value, FetchError> {
    if let Ok(msg) = std::env::var(ENV_TEST_ANALYTICS_ERROR) {
      return Err(FetchError::Transport(msg));
    }
    env_json(ENV_TEST_ANALYTICS_JSON, json!({ "rows": [] }))
  }
}

// --- Lookup cache ---
// Programs and org units rarely change within a run; analytics always hits the server.
pub struct CachedAnalyticsApi {
  inner: Arc<dyn AnalyticsApi>,
  programs: Mutex<HashMap<u32, Value>>,
  org_units: Mutex<Option<Value>>,
}

impl CachedAnalyticsApi {
  pub fn new(inner: Arc<dyn AnalyticsApi>) -> Self {
    Self {
      inner,
      programs: Mutex::new(HashMap::new()),
      org_units: Mutex::new(None),
    }
  }
}

impl AnalyticsApi for CachedAnalyticsApi {
  fn list_programs_json(&self, page_size: u32) -> Result<Value, FetchError> {
    if let Some(v) = self.programs.lock().ok().and_then(|m| m.get(&page_size).cloned()) {
      return Ok(v);
    }
    let v = self.inner.list_programs_json(page_size)?;

    if let Ok(mut map) = self.programs.lock() {
      map.insert(page_size, v.clone());
    }

    Ok(v)
  }

  fn list_org_units_json(&self) -> Result<Value, FetchError> {
    if let Some(v) = self.org_units.lock().ok().and_then(|g| g.clone()) {
      return Ok(v);
    }
    let v = self.inner.list_org_units_json()?;

    if let Ok(mut slot) = self.org_units.lock() {
      *slot = Some(v.clone());
    }

    Ok(v)
  }

  fn fetch_analytics_json(&self, query: &ReportQuery) -> Result<Value, FetchError> {
    self.inner.fetch_analytics_json(query)
  }
}

pub fn env_wants_mock() -> bool {
  std::env::vars().any(|(k, _)| k.starts_with("ARB_TEST_"))
}

/// Pick a backend: env test double when `ARB_TEST_*` is set, otherwise HTTP.
pub fn build_api(settings: &ApiSettings) -> Result<Arc<dyn AnalyticsApi>> {
  let inner: Arc<dyn AnalyticsApi> = if env_wants_mock() {
    debug!("using env-backed analytics api");
    Arc::new(EnvAnalyticsApi)
  } else if let Some(base) = &settings.base_url {
    Arc::new(HttpAnalyticsApi::new(base.clone(), settings.token.clone(), settings.timeout))
  } else {
    bail!("No analytics server configured: pass --base-url or set ARB_BASE_URL")
  };

  Ok(Arc::new(CachedAnalyticsApi::new(inner)))
}
