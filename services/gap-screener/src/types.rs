use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stock that gapped at the open, as read from the daily gap list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub ticker: String,
    pub gap_percent: f64,        // 0.15 == gapped up 15% from previous close
    pub opening_price: f64,
}

impl Candidate {
    pub fn new(ticker: impl Into<String>, gap_percent: f64, opening_price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            gap_percent,
            opening_price,
        }
    }
}

/// Sized trade plan for one candidate. Prices and profit are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub entry_price: f64,
    pub share_count: u64,
    pub take_profit_price: f64,
    pub stop_loss_price: f64,
    pub expected_profit: f64,
}

/// Headline attached to a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub published_at: DateTime<Utc>,
    pub headline: String,
}

/// Candidate position enriched with whatever news could be fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub ticker: String,
    #[serde(flatten)]
    pub position: Position,
    pub articles: Vec<NewsItem>,
    /// Set when the news lookup failed and `articles` is empty because of it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_error: Option<String>,
}

impl Selection {
    pub fn enriched(ticker: impl Into<String>, position: Position, articles: Vec<NewsItem>) -> Self {
        Self {
            ticker: ticker.into(),
            position,
            articles,
            news_error: None,
        }
    }

    /// Keeps ticker and position; only the news is missing.
    pub fn degraded(ticker: impl Into<String>, position: Position, error: impl ToString) -> Self {
        Self {
            ticker: ticker.into(),
            position,
            articles: Vec::new(),
            news_error: Some(error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.news_error.is_some()
    }
}

/// All selections of one run, in completion order
pub type Batch = Vec<Selection>;

/// Error types for the screener and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("News API request failed: {0}")]
    Api(String),

    #[error("Rate limit exceeded for {source_name}")]
    RateLimit {
        source_name: String,
        retry_after: Option<u64>,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("News lookup for {ticker} timed out after {millis}ms")]
    Timeout { ticker: String, millis: u128 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Batch incomplete: expected {expected} selections, received {received}")]
    IncompleteBatch { expected: usize, received: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for screener operations
pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Source of the day's gap candidates
#[async_trait::async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self) -> Result<Vec<Candidate>>;
}

/// Narrows the loaded candidates down to the ones worth sizing
pub trait Filterer: Send + Sync {
    fn filter(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;
}

/// Trait for news providers
///
/// Implementations are shared across pipeline tasks and called concurrently.
#[async_trait::async_trait]
pub trait NewsGateway: Send + Sync {
    /// Recent headlines for a ticker
    async fn fetch(&self, ticker: &str) -> Result<Vec<NewsItem>>;

    /// Source name
    fn name(&self) -> &str;
}

/// Sink for a finished batch
#[async_trait::async_trait]
pub trait Deliverer: Send + Sync {
    async fn deliver(&self, batch: &[Selection]) -> Result<()>;
}
