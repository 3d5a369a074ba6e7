//! Selection pipeline: one task per candidate, fanned back in through a
//! bounded channel sized to the batch.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::position::PositionCalculator;
use crate::types::*;

/// Sizes every candidate and enriches it with news, concurrently
#[derive(Debug, Clone, Default)]
pub struct SelectionPipeline {
    calculator: PositionCalculator,
    task_timeout: Option<Duration>,
}

impl SelectionPipeline {
    pub fn new(calculator: PositionCalculator) -> Self {
        Self {
            calculator,
            task_timeout: None,
        }
    }

    /// Bound each news lookup. Without it a hung provider call holds up the whole batch.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    pub fn calculator(&self) -> &PositionCalculator {
        &self.calculator
    }

    /// Run one task per candidate and wait for all of them.
    ///
    /// Returns exactly one selection per candidate, in completion order. A
    /// failed news lookup degrades its selection instead of failing the run.
    pub async fn run(
        &self,
        candidates: Vec<Candidate>,
        news: Arc<dyn NewsGateway>,
    ) -> Result<Batch> {
        let expected = candidates.len();
        if expected == 0 {
            debug!("No candidates to select");
            return Ok(Vec::new());
        }

        // One slot per task: senders never wait on the collector
        let (tx, mut rx) = mpsc::channel::<Selection>(expected);

        for candidate in candidates {
            let tx = tx.clone();
            let news = Arc::clone(&news);
            let calculator = self.calculator;
            let task_timeout = self.task_timeout;

            tokio::spawn(async move {
                let selection = select(candidate, &calculator, news.as_ref(), task_timeout).await;
                if let Err(e) = tx.send(selection).await {
                    debug!("Collector gone, dropping selection for {}", e.0.ticker);
                }
            });
        }

        // Only task-held senders remain, so the channel closes once every task is done
        drop(tx);

        let mut batch = Vec::with_capacity(expected);
        while batch.len() < expected {
            match rx.recv().await {
                Some(selection) => batch.push(selection),
                None => break,
            }
        }

        if batch.len() != expected {
            return Err(ScreenerError::IncompleteBatch {
                expected,
                received: batch.len(),
            });
        }

        Ok(batch)
    }
}

/// Work for a single candidate; always yields a selection
async fn select(
    candidate: Candidate,
    calculator: &PositionCalculator,
    news: &dyn NewsGateway,
    task_timeout: Option<Duration>,
) -> Selection {
    let position = calculator.calculate(candidate.gap_percent, candidate.opening_price);

    match fetch_news(news, &candidate.ticker, task_timeout).await {
        Ok(articles) => {
            info!("Found {} articles about {}", articles.len(), candidate.ticker);
            Selection::enriched(candidate.ticker, position, articles)
        }
        Err(e) => {
            warn!("Error loading news about {}: {}", candidate.ticker, e);
            Selection::degraded(candidate.ticker, position, e)
        }
    }
}

async fn fetch_news(
    news: &dyn NewsGateway,
    ticker: &str,
    task_timeout: Option<Duration>,
) -> Result<Vec<NewsItem>> {
    let lookup = AssertUnwindSafe(news.fetch(ticker)).catch_unwind();

    let outcome = match task_timeout {
        Some(limit) => tokio::time::timeout(limit, lookup).await.map_err(|_| {
            ScreenerError::Timeout {
                ticker: ticker.to_string(),
                millis: limit.as_millis(),
            }
        })?,
        None => lookup.await,
    };

    outcome.unwrap_or_else(|panic| {
        Err(ScreenerError::Api(format!(
            "{} panicked: {}",
            news.name(),
            panic_message(panic.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
