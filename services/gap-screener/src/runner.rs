//! Screener Runner - load, filter, select, deliver

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::pipeline::SelectionPipeline;
use crate::types::*;

/// Counts for one completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct RunSummary {
    pub loaded: usize,
    pub selected: usize,
    pub enriched: usize,
    pub degraded: usize,
    pub articles: usize,
}

impl RunSummary {
    fn from_batch(loaded: usize, batch: &[Selection]) -> Self {
        let degraded = batch.iter().filter(|s| s.is_degraded()).count();
        Self {
            loaded,
            selected: batch.len(),
            enriched: batch.len() - degraded,
            degraded,
            articles: batch.iter().map(|s| s.articles.len()).sum(),
        }
    }
}

/// Run one screening pass end to end.
///
/// Only loading, batch assembly and delivery can fail the run; each error
/// names its phase. News failures show up as degraded selections instead.
pub async fn run(
    loader: &dyn Loader,
    filterer: &dyn Filterer,
    pipeline: &SelectionPipeline,
    news: Arc<dyn NewsGateway>,
    deliverer: &dyn Deliverer,
) -> anyhow::Result<RunSummary> {
    let candidates = loader.load().await.context("failed to load candidates")?;
    let loaded = candidates.len();

    let candidates = filterer.filter(candidates);
    info!(
        "Screening {} of {} candidates with news from {}",
        candidates.len(),
        loaded,
        news.name()
    );

    let batch = pipeline
        .run(candidates, news)
        .await
        .context("failed to assemble selections")?;

    let summary = RunSummary::from_batch(loaded, &batch);
    if summary.degraded > 0 {
        warn!(
            "{} of {} selections have no news (lookup failed)",
            summary.degraded, summary.selected
        );
    }

    deliverer
        .deliver(&batch)
        .await
        .context("failed to deliver selections")?;

    info!(
        "Run complete: loaded={} selected={} enriched={} degraded={} articles={}",
        summary.loaded, summary.selected, summary.enriched, summary.degraded, summary.articles
    );

    Ok(summary)
}
