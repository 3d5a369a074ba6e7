use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::*;

/// Loads gap candidates from a CSV export.
///
/// The first row is a header. Columns are read by position: ticker, gap,
/// opening price. Rows that are not valid UTF-8, or whose numbers do not
/// parse to finite values, are skipped.
pub struct CsvCandidateLoader {
    path: PathBuf,
}

impl CsvCandidateLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse candidates from raw CSV bytes
    pub fn parse(bytes: &[u8]) -> Result<Vec<Candidate>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut candidates = Vec::new();

        for (index, record) in reader.byte_records().enumerate() {
            let line = index + 2; // 1-based, after the header
            let record = match csv::StringRecord::from_byte_record(record?) {
                Ok(record) => record,
                Err(e) => {
                    debug!("Skipping line {}: {}", line, e);
                    continue;
                }
            };

            let (ticker, gap, open) = match (record.get(0), record.get(1), record.get(2)) {
                (Some(t), Some(g), Some(o)) => (t, g, o),
                _ => {
                    debug!("Skipping line {}: expected 3 fields, got {}", line, record.len());
                    continue;
                }
            };

            if ticker.is_empty() {
                debug!("Skipping line {}: empty ticker", line);
                continue;
            }

            let gap_percent = match gap.parse::<f64>() {
                Ok(v) => v,
                Err(e) => {
                    debug!("Skipping {} on line {}: bad gap {:?} ({})", ticker, line, gap, e);
                    continue;
                }
            };

            let opening_price = match open.parse::<f64>() {
                Ok(v) => v,
                Err(e) => {
                    debug!("Skipping {} on line {}: bad opening price {:?} ({})", ticker, line, open, e);
                    continue;
                }
            };

            if !gap_percent.is_finite() || !opening_price.is_finite() {
                debug!(
                    "Skipping {} on line {}: non-finite gap {} or opening price {}",
                    ticker, line, gap_percent, opening_price
                );
                continue;
            }

            candidates.push(Candidate::new(ticker, gap_percent, opening_price));
        }

        Ok(candidates)
    }
}

#[async_trait::async_trait]
impl Loader for CsvCandidateLoader {
    async fn load(&self) -> Result<Vec<Candidate>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let candidates = Self::parse(&bytes)?;
        info!("Loaded {} candidates from {}", candidates.len(), self.path.display());
        Ok(candidates)
    }
}
