//! Build monthly analytics reports for a program and organisation unit.
//!
//! A [`selection::Selection`] is validated into a [`query::ReportQuery`]
//! whose periods come from [`period::expand_periods`]; the
//! [`orchestrator::ReportOrchestrator`] dispatches the analytics call and
//! exposes the request lifecycle as [`model::FetchState`].

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod ext;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod period;
pub mod query;
pub mod render;
pub mod runner;
pub mod selection;
pub mod util;
