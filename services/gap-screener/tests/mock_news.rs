//! In-memory news gateways for exercising the pipeline without a provider

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use gap_screener::{NewsGateway, NewsItem, Result, ScreenerError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers a lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Articles(usize),
    Fail,
    Panic,
    Hang,
}

/// Mock gateway with per-ticker behavior and call accounting
pub struct MockNewsGateway {
    default: Behavior,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    hanging: HashSet<String>,
    /// Stagger replies so tasks finish out of input order
    jitter: Option<fn(&str) -> Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockNewsGateway {
    pub fn new(default: Behavior) -> Self {
        Self {
            default,
            failing: HashSet::new(),
            panicking: HashSet::new(),
            hanging: HashSet::new(),
            jitter: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.extend(tickers.into_iter().map(Into::into));
        self
    }

    pub fn panicking_for<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.panicking.extend(tickers.into_iter().map(Into::into));
        self
    }

    pub fn hanging_for<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hanging.extend(tickers.into_iter().map(Into::into));
        self
    }

    pub fn with_jitter(mut self, jitter: fn(&str) -> Duration) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn behavior_for(&self, ticker: &str) -> Behavior {
        if self.panicking.contains(ticker) {
            Behavior::Panic
        } else if self.hanging.contains(ticker) {
            Behavior::Hang
        } else if self.failing.contains(ticker) {
            Behavior::Fail
        } else {
            self.default
        }
    }
}

#[async_trait::async_trait]
impl NewsGateway for MockNewsGateway {
    async fn fetch(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(ticker.to_string());

        if let Some(jitter) = self.jitter {
            tokio::time::sleep(jitter(ticker)).await;
        }

        match self.behavior_for(ticker) {
            Behavior::Articles(count) => {
                let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
                Ok((0..count)
                    .map(|i| NewsItem {
                        published_at: base - ChronoDuration::minutes(i as i64),
                        headline: format!("{} headline #{}", ticker, i + 1),
                    })
                    .collect())
            }
            Behavior::Fail => Err(ScreenerError::Api(format!(
                "error fetching news for {}: 503 Service Unavailable",
                ticker
            ))),
            Behavior::Panic => panic!("mock provider blew up on {}", ticker),
            Behavior::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Tickers T000..T{n-1}
pub fn tickers(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("T{:03}", i)).collect()
}

/// Every k-th ticker out of `n`, for a failure fraction of 1/k
pub fn every_nth(n: usize, k: usize) -> Vec<String> {
    tickers(n).into_iter().step_by(k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockNewsGateway::new(Behavior::Articles(2)).failing_for(["BAD"]);

        let ok = mock.fetch("GOOD").await.unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[0].headline, "GOOD headline #1");
        assert!(mock.fetch("BAD").await.is_err());

        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.seen(), vec!["GOOD".to_string(), "BAD".to_string()]);
    }

    #[test]
    fn test_every_nth() {
        assert_eq!(every_nth(10, 4), vec!["T000", "T004", "T008"]);
        assert!(every_nth(0, 2).is_empty());
    }
}
