// === Module Header (agents-tooling) START ===
// purpose: Namespace for the analytics server integration (API seam, payload validation, lookups)
// role: analytics/namespace
// invariants: Everything that touches the wire lives here; the orchestrator only sees typed results
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod lookups;
pub mod payload;
