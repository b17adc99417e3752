// === Module Header (agents-tooling) START ===
// purpose: Resolve analytics server settings from flags and environment
// role: config/api
// inputs: Optional CLI values; env ARB_BASE_URL, ARB_API_TOKEN
// outputs: ApiSettings consumed by analytics::api::build_api
// invariants: Flags win over environment; blank values count as unset
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::time::Duration;

use serde::Serialize;

pub const ENV_BASE_URL: &str = "ARB_BASE_URL";
pub const ENV_API_TOKEN: &str = "ARB_API_TOKEN";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ApiSettings {
  pub base_url: Option<String>,
  #[serde(skip_serializing)]
  pub token: Option<String>,
  pub timeout: Option<Duration>,
  pub page_size: u32,
}

impl fmt::Debug for ApiSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ApiSettings")
      .field("base_url", &self.base_url)
      .field("token", &self.token.as_ref().map(|_| "<redacted>"))
      .field("timeout", &self.timeout)
      .field("page_size", &self.page_size)
      .finish()
  }
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      base_url: None,
      token: None,
      timeout: None,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

fn flag_or_env(flag: Option<&str>, key: &str) -> Option<String> {
  if let Some(v) = flag.map(str::trim).filter(|v| !v.is_empty()) {
    return Some(v.to_string());
  }

  std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Server root, e.g. `https://play.example.org/dev`; flag first, then `ARB_BASE_URL`.
pub fn resolve_base_url(flag: Option<&str>) -> Option<String> {
  flag_or_env(flag, ENV_BASE_URL)
}

/// Personal access token: flag first, then `ARB_API_TOKEN`.
pub fn discover_token(flag: Option<&str>) -> Option<String> {
  flag_or_env(flag, ENV_API_TOKEN)
}
