// Candidate filtering applied between loading and sizing
use crate::types::*;
use tracing::debug;

/// Drops candidates whose gap is too small to trade
#[derive(Debug, Clone, Copy)]
pub struct GapFilter {
    min_gap: f64,
}

impl GapFilter {
    pub fn new(min_gap: f64) -> Self {
        Self { min_gap }
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }
}

impl Default for GapFilter {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Filterer for GapFilter {
    fn filter(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let before = candidates.len();
        let kept: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| c.gap_percent.abs() >= self.min_gap)
            .collect();

        debug!(
            "Gap filter kept {} of {} candidates (|gap| >= {})",
            kept.len(),
            before,
            self.min_gap
        );
        kept
    }
}
