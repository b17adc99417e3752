// === Module Header (agents-tooling) START ===
// purpose: Drive report requests: validate, dispatch one analytics call per generate, apply completions to FetchState
// role: processing/orchestrator
// inputs: Selection snapshots from the caller; completions posted back by request workers
// outputs: Observable FetchState (Idle | Loading | Success | Failure)
// side_effects: Spawns one worker thread per dispatched request; the worker performs the network call
// invariants:
// - Validation failures are returned synchronously and leave FetchState untouched
// - Every dispatch bumps a monotonically increasing sequence number and sets Loading
// - Only the completion carrying the latest sequence number changes FetchState; older ones are dropped
// - FetchState is only written on the owning thread (generate / poll / wait)
// errors: ValidationError returned from generate; FetchError captured as Failure(message)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::analytics::api::AnalyticsApi;
use crate::analytics::payload::parse_report;
use crate::error::{FetchError, ValidationError};
use crate::model::{FetchState, ReportResult};
use crate::query::{build_query, ReportQuery};
use crate::selection::Selection;

/// Result of a worker's request, tagged with the sequence number it was issued under.
#[derive(Debug)]
struct Completion {
  seq: u64,
  outcome: Result<ReportResult, FetchError>,
}

/// Handle for a request that has been sent off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
  pub seq: u64,
  pub query: ReportQuery,
}

/// What happened to a completion once it reached the orchestrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Applied {
  /// It was the latest request; FetchState now reflects it.
  Current,
  /// A newer request had been issued; the result was dropped.
  Stale,
}

pub struct ReportOrchestrator {
  api: Arc<dyn AnalyticsApi>,
  state: FetchState,
  latest_seq: u64,
  tx: Sender<Completion>,
  rx: Receiver<Completion>,
}

impl ReportOrchestrator {
  pub fn new(api: Arc<dyn AnalyticsApi>) -> Self {
    let (tx, rx) = mpsc::channel();

    Self {
      api,
      state: FetchState::Idle,
      latest_seq: 0,
      tx,
      rx,
    }
  }

  pub fn state(&self) -> &FetchState {
    &self.state
  }

  /// Sequence number of the most recent dispatch; 0 before the first one.
  pub fn latest_seq(&self) -> u64 {
    self.latest_seq
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Validate `selection` and, if it is complete, start fetching its report.
  ///
  /// Returns immediately; the outcome arrives through [`poll`](Self::poll) or
  /// [`wait`](Self::wait). Calling this again while a request is in flight is
  /// allowed and supersedes the earlier request.
  pub fn generate(&mut self, selection: &Selection) -> Result<Dispatched, ValidationError> {
    let query = build_query(selection).inspect_err(|e| warn!(error = %e, "selection rejected"))?;

    self.latest_seq += 1;
    let seq = self.latest_seq;
    self.state = FetchState::Loading;

    info!(
      seq,
      program = query.program_id(),
      org_unit = query.org_unit_id(),
      periods = query.periods().len(),
      "dispatching analytics request"
    );

    let api = Arc::clone(&self.api);
    let tx = self.tx.clone();
    let worker_query = query.clone();

    let spawned = thread::Builder::new()
      .name(format!("analytics-{seq}"))
      .spawn(move || {
        let outcome = api
          .fetch_analytics_json(&worker_query)
          .and_then(|payload| parse_report(&payload));
        // The orchestrator may have been dropped; nothing left to notify then.
        let _ = tx.send(Completion { seq, outcome });
      });

    if let Err(e) = spawned {
      let _ = self.tx.send(Completion {
        seq,
        outcome: Err(FetchError::Transport(format!("could not start request worker: {e}"))),
      });
    }

    Ok(Dispatched { seq, query })
  }

  fn apply(&mut self, completion: Completion) -> Applied {
    if completion.seq != self.latest_seq {
      debug!(seq = completion.seq, latest = self.latest_seq, "discarding stale completion");
      return Applied::Stale;
    }

    self.state = match completion.outcome {
      Ok(result) => {
        info!(seq = completion.seq, rows = result.rows.len(), "report ready");
        FetchState::Success(result)
      }
      Err(e) => {
        warn!(seq = completion.seq, error = %e, "report request failed");
        FetchState::Failure(e.to_string())
      }
    };

    Applied::Current
  }

  /// Apply every completion that has already arrived, without blocking.
  pub fn poll(&mut self) -> Vec<Applied> {
    let mut applied = Vec::new();

    while let Ok(c) = self.rx.try_recv() {
      applied.push(self.apply(c));
    }

    applied
  }

  /// Block up to `timeout` for the next completion and apply it.
  pub fn wait(&mut self, timeout: Duration) -> Option<Applied> {
    let c = self.rx.recv_timeout(timeout).ok()?;
    Some(self.apply(c))
  }

  /// Keep applying completions until the state leaves Loading or `timeout` elapses.
  /// A timeout too large to represent as an `Instant` waits without a deadline.
  pub fn wait_settled(&mut self, timeout: Duration) -> &FetchState {
    let deadline = Instant::now().checked_add(timeout);

    while self.is_loading() {
      let remaining = match deadline {
        Some(d) => d.saturating_duration_since(Instant::now()),
        None => Duration::MAX,
      };

      if remaining.is_zero() || self.wait(remaining).is_none() {
        break;
      }
    }

    &self.state
  }
}
