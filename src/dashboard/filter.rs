use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboard::dataset::{DashboardRecord, Dataset};

// ============================================================================
// Filter selections
// ============================================================================

/// The user's current selections.
///
/// `None` means "everything": all projects, all suites, and the full
/// observed date span for a missing bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardFilter {
    pub projects: Option<BTreeSet<String>>,
    pub suites: Option<BTreeSet<String>>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Inclusive date range a filter resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl DashboardFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = Some(projects.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_suites<I, S>(mut self, suites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suites = Some(suites.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Fill missing bounds from the dataset's observed span. `None` when a
    /// bound is still missing because no row carries a valid date.
    pub fn resolve_range(&self, dataset: &Dataset) -> Option<DateRange> {
        let span = dataset.date_span();
        let from = self.from.or(span.map(|(lo, _)| lo))?;
        let to = self.to.or(span.map(|(_, hi)| hi))?;
        Some(DateRange { from, to })
    }

    /// Whether a single row passes all three predicates.
    pub fn matches(&self, record: &DashboardRecord, range: Option<DateRange>) -> bool {
        let project_ok = self
            .projects
            .as_ref()
            .is_none_or(|selected| selected.contains(&record.project));
        let suite_ok = self
            .suites
            .as_ref()
            .is_none_or(|selected| selected.contains(&record.suite));
        // Rows without a date never fall inside a range
        let date_ok = match (range, record.date) {
            (Some(range), Some(date)) => range.contains(date),
            _ => false,
        };
        project_ok && suite_ok && date_ok
    }
}

/// Rows matching every selection, in file order.
pub fn apply<'a>(dataset: &'a Dataset, filter: &DashboardFilter) -> Vec<&'a DashboardRecord> {
    let range = filter.resolve_range(dataset);
    dataset
        .records
        .iter()
        .filter(|record| filter.matches(record, range))
        .collect()
}
