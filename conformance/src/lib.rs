//! # pms-conformance
//!
//! Drives `pms-core` through a fixed list of endpoint scenarios and reports,
//! one line per scenario, whether the vendor API behaves as documented.
//!
//! - [`schemas`]: the compiled JSON Schemas payloads are checked against.
//! - [`report`]: pass/fail lines and the run summary.
//! - [`scenarios`]: the scenarios themselves and their fixed order.
//! - [`config`]: command-line configuration.

pub mod config;
pub mod report;
pub mod scenarios;
pub mod schemas;

pub use config::Config;
pub use report::{Report, ScenarioReport, Violation};
pub use scenarios::{Checker, Scenario};
pub use schemas::{SchemaError, SchemaName, SchemaSet};
