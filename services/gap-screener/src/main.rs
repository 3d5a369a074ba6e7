//! Gap Screener - daily opening-gap trade selection
//!
//! 1. Loads the gap list exported for today
//! 2. Keeps gaps of at least `min_gap`
//! 3. Sizes a position per candidate and pulls its latest headlines
//! 4. Writes the selections as JSON

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, Level};

use gap_screener::{
    CsvCandidateLoader, GapFilter, JsonFileDeliverer, PositionCalculator, SeekingAlphaClient,
    SelectionPipeline, Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // .env is optional; real environment variables win
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    let settings = Settings::load().context("failed to load settings")?;
    info!(
        "Input: {}, output: {}, min gap: {}",
        settings.input_path.display(),
        settings.output_path.display(),
        settings.min_gap
    );

    let news = SeekingAlphaClient::from_config(&settings.news)
        .context("failed to create news client")?;
    info!("✓ News client initialized ({})", news.base_url());

    let mut pipeline = SelectionPipeline::new(PositionCalculator::new(settings.risk));
    if let Some(timeout) = settings.news.task_timeout() {
        pipeline = pipeline.with_task_timeout(timeout);
    }

    let summary = gap_screener::run(
        &CsvCandidateLoader::new(&settings.input_path),
        &GapFilter::new(settings.min_gap),
        &pipeline,
        Arc::new(news),
        &JsonFileDeliverer::new(&settings.output_path),
    )
    .await?;

    info!(
        "Wrote {} selections to {}",
        summary.selected,
        settings.output_path.display()
    );

    Ok(())
}
