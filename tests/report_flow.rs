use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use analytics_report_builder::analytics::api::{AnalyticsApi, CachedAnalyticsApi};
use analytics_report_builder::analytics::lookups::{load_org_units, load_programs};
use analytics_report_builder::error::FetchError;
use analytics_report_builder::model::FetchState;
use analytics_report_builder::orchestrator::ReportOrchestrator;
use analytics_report_builder::query::ReportQuery;
use analytics_report_builder::render::report_document;
use analytics_report_builder::selection::SelectionStore;
use chrono::NaiveDate;
use serde_json::Value;
use test_support::{init_tracing, read_fixture_json};

/// Serves the checked-in fixtures and records what the analytics endpoint was asked for.
struct FixtureApi {
  analytics_calls: AtomicUsize,
  last_periods: std::sync::Mutex<Option<String>>,
}

impl FixtureApi {
  fn new() -> Arc<Self> {
    Arc::new(Self {
      analytics_calls: AtomicUsize::new(0),
      last_periods: std::sync::Mutex::new(None),
    })
  }
}

impl AnalyticsApi for FixtureApi {
  fn list_programs_json(&self, _page_size: u32) -> Result<Value, FetchError> {
    Ok(read_fixture_json("programs.json"))
  }

  fn list_org_units_json(&self) -> Result<Value, FetchError> {
    Ok(read_fixture_json("org_units.json"))
  }

  fn fetch_analytics_json(&self, query: &ReportQuery) -> Result<Value, FetchError> {
    self.analytics_calls.fetch_add(1, Ordering::SeqCst);
    *self.last_periods.lock().unwrap() = Some(query.period_dimension());
    Ok(read_fixture_json("analytics_rows.json"))
  }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn pick_from_lookups_then_generate() {
  init_tracing();
  let fixtures = FixtureApi::new();
  let api = Arc::new(CachedAnalyticsApi::new(fixtures.clone()));

  let programs = load_programs(api.as_ref(), 50).unwrap();
  let units = load_org_units(api.as_ref()).unwrap();

  let mut store = SelectionStore::new();
  store.set_org_unit(units[0].id.as_str());
  store.set_start_date(d(2023, 11, 20));
  store.set_end_date(d(2024, 1, 3));

  let mut orchestrator = ReportOrchestrator::new(api.clone());

  // Program not picked yet: rejected, nothing sent.
  let err = orchestrator.generate(&store.snapshot()).unwrap_err();
  assert!(err.to_string().contains("programId"));
  assert_eq!(orchestrator.state(), &FetchState::Idle);

  store.set_program(programs[0].id.as_str());
  let dispatched = orchestrator.generate(&store.snapshot()).unwrap();
  assert_eq!(orchestrator.state(), &FetchState::Loading);

  orchestrator.wait_settled(Duration::from_secs(5));
  let FetchState::Success(result) = orchestrator.state() else {
    panic!("expected success, got {:?}", orchestrator.state());
  };
  assert_eq!(result.rows.len(), 2);

  let doc = report_document(&dispatched.query, result, true);
  assert_eq!(doc.summary.program_id, "IpHINAT79UW");
  assert_eq!(doc.summary.org_unit_id, "ImspTQPwCqd");
  assert_eq!(doc.rows[0].data_element, "ANC 1st visit");

  assert_eq!(fixtures.analytics_calls.load(Ordering::SeqCst), 1);
  assert_eq!(
    fixtures.last_periods.lock().unwrap().as_deref(),
    Some("202311;202312;202401")
  );
}

#[test]
fn each_generate_issues_exactly_one_call() {
  let fixtures = FixtureApi::new();
  let mut orchestrator = ReportOrchestrator::new(fixtures.clone());

  let mut store = SelectionStore::new();
  store.set_program("P1");
  store.set_org_unit("OU1");
  store.set_start_date(d(2023, 6, 1));
  store.set_end_date(d(2023, 6, 30));

  for expected in 1..=3 {
    let dispatched = orchestrator.generate(&store.snapshot()).unwrap();
    assert_eq!(dispatched.seq, expected);
    orchestrator.wait_settled(Duration::from_secs(5));
    assert_eq!(fixtures.analytics_calls.load(Ordering::SeqCst), expected as usize);
  }

  assert!(matches!(orchestrator.state(), FetchState::Success(_)));
  assert_eq!(fixtures.last_periods.lock().unwrap().as_deref(), Some("202306"));
}
