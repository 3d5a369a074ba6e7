use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::config::NewsConfig;
use crate::types::*;

const SOURCE_NAME: &str = "seeking_alpha";
const API_KEY_HEADER: &str = "x-rapidapi-key";
const LIST_BY_SYMBOL: &str = "/news/v2/list-by-symbol";

/// Seeking Alpha news client (RapidAPI)
pub struct SeekingAlphaClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
    timeout: Duration,
}

impl SeekingAlphaClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ScreenerError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_size,
            timeout,
        })
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.api_key()?,
            config.page_size,
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Latest headlines for a ticker. Failures are returned as-is; no retry.
    pub async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        let url = format!("{}{}", self.base_url, LIST_BY_SYMBOL);
        let size = self.page_size.to_string();

        debug!("Fetching news for {} from {}", ticker, url);

        let response = self
            .client
            .get(&url)
            .query(&[("id", ticker), ("size", size.as_str())])
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScreenerError::Timeout {
                        ticker: ticker.to_string(),
                        millis: self.timeout.as_millis(),
                    }
                } else {
                    ScreenerError::Api(e.to_string())
                }
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            return Err(ScreenerError::RateLimit {
                source_name: SOURCE_NAME.to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ScreenerError::Api(format!(
                "error fetching news for {}: {} - {}",
                ticker, status, text
            )));
        }

        let body: NewsListResponse = response
            .json()
            .await
            .map_err(|e| ScreenerError::InvalidResponse(e.to_string()))?;

        Ok(body.into_items(ticker))
    }
}

// Response types for the list-by-symbol endpoint
#[derive(Debug, serde::Deserialize)]
struct NewsListResponse {
    #[serde(default)]
    data: Vec<NewsEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct NewsEntry {
    #[serde(default)]
    attributes: Option<NewsAttributes>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsAttributes {
    publish_on: Option<String>,
    title: Option<String>,
}

impl NewsListResponse {
    /// Keep entries that have both a headline and a parseable timestamp
    fn into_items(self, ticker: &str) -> Vec<NewsItem> {
        self.data
            .into_iter()
            .filter_map(|entry| {
                let attrs = entry.attributes?;
                let headline = match attrs.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
                    Some(headline) => headline,
                    None => {
                        debug!("Skipping {} article without a title", ticker);
                        return None;
                    }
                };
                let published_at = attrs
                    .publish_on
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                match published_at {
                    Some(published_at) => Some(NewsItem { published_at, headline }),
                    None => {
                        debug!("Skipping {} article without a valid publish time: {}", ticker, headline);
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl NewsGateway for SeekingAlphaClient {
    async fn fetch(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        SeekingAlphaClient::get_news(self, ticker).await
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
