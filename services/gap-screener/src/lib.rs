//! Gap Screener Library
//!
//! Sizes a risk-bounded fade trade for each stock that gapped at the open and
//! attaches the latest headlines, fetching news for all candidates at once.

pub mod config;
pub mod delivery;
pub mod filters;
pub mod pipeline;
pub mod position;
pub mod runner;
pub mod types;
pub mod sources {
    pub mod csv_file;
    pub mod seeking_alpha;
}

mod tests;

// Re-export main types for convenience
pub use crate::config::{NewsConfig, RiskConfig, Settings};
pub use delivery::JsonFileDeliverer;
pub use filters::GapFilter;
pub use pipeline::SelectionPipeline;
pub use position::{round2, PositionCalculator};
pub use runner::{run, RunSummary};
pub use sources::csv_file::CsvCandidateLoader;
pub use sources::seeking_alpha::SeekingAlphaClient;
pub use types::*;
