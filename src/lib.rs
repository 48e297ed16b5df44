//! Turn JUnit XML test reports into a flat CSV table and render
//! pass/fail dashboards over it.
//!
//! The two halves only meet through the CSV file:
//! - [`extract`] walks a report directory and flattens every `<testcase>`
//!   into a [`extract::TestRecord`].
//! - [`dashboard`] loads the table back, applies project/suite/date filters
//!   and derives KPIs and chart series; [`report`] renders them.

pub mod cli;
pub mod dashboard;
pub mod extract;
pub mod report;
