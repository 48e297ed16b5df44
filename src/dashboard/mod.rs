//! Dashboard side: load the CSV hand-off file, filter it and derive the
//! KPIs, chart series and detail rows the reporters render.

pub mod charts;
pub mod dataset;
pub mod filter;
pub mod metrics;
pub mod view;

use thiserror::Error;

pub use dataset::{Dataset, DatasetCache, DashboardRecord};
pub use filter::DashboardFilter;
pub use view::DashboardView;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse dataset: {0}")]
    Csv(#[from] csv::Error),
}
