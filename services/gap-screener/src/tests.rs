//! Cross-module tests for the gap screener

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::delivery::JsonFileDeliverer;
    use crate::filters::GapFilter;
    use crate::pipeline::SelectionPipeline;
    use crate::position::PositionCalculator;
    use crate::sources::csv_file::CsvCandidateLoader;
    use crate::types::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tokio_test::assert_ok;

    struct HeadlineNews;

    #[async_trait::async_trait]
    impl NewsGateway for HeadlineNews {
        async fn fetch(&self, ticker: &str) -> Result<Vec<NewsItem>> {
            Ok(vec![NewsItem {
                published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                headline: format!("Why {} is moving", ticker),
            }])
        }

        fn name(&self) -> &str {
            "headline"
        }
    }

    #[tokio::test]
    async fn test_csv_to_json_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("opg.csv");
        let output = dir.path().join("opg.json");
        std::fs::write(
            &input,
            "Ticker,Gap,OpeningPrice\nABC,0.15,50.0\nSMALL,0.04,12.0\nBROKEN,x,1\nDEF,-0.2,10\n",
        )
        .unwrap();

        let settings = Settings::default();
        let summary = assert_ok!(
            crate::run(
                &CsvCandidateLoader::new(&input),
                &GapFilter::new(settings.min_gap),
                &SelectionPipeline::new(PositionCalculator::new(settings.risk)),
                Arc::new(HeadlineNews),
                &JsonFileDeliverer::new(&output),
            )
            .await
        );

        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.selected, 2);
        assert_eq!(summary.enriched, 2);
        assert_eq!(summary.articles, 2);

        let mut batch: Batch = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        batch.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        assert_eq!(batch[0].ticker, "ABC");
        assert_eq!(batch[0].position.share_count, 383);
        assert_eq!(batch[0].position.expected_profit, 1998.26);
        assert_eq!(batch[0].articles[0].headline, "Why ABC is moving");

        assert_eq!(batch[1].ticker, "DEF");
        assert_eq!(batch[1].position.stop_loss_price, 8.0);
        assert_eq!(batch[1].position.take_profit_price, 12.0);
    }

    #[tokio::test]
    async fn test_non_finite_rows_never_reach_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("opg.csv");
        let output = dir.path().join("opg.json");
        std::fs::write(
            &input,
            "Ticker,Gap,OpeningPrice\nABC,0.15,inf\nDEF,0.2,NaN\nGHI,-0.2,10\n",
        )
        .unwrap();

        let summary = assert_ok!(
            crate::run(
                &CsvCandidateLoader::new(&input),
                &GapFilter::default(),
                &SelectionPipeline::default(),
                Arc::new(HeadlineNews),
                &JsonFileDeliverer::new(&output),
            )
            .await
        );
        assert_eq!(summary.loaded, 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(!written.contains("null"), "{}", written);

        let batch: Batch = assert_ok!(serde_json::from_str(&written));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].ticker, "GHI");
    }

    #[test]
    fn test_default_settings_match_component_defaults() {
        let settings = Settings::default();
        assert_eq!(GapFilter::default().min_gap(), settings.min_gap);
        assert_eq!(*PositionCalculator::default().risk(), settings.risk);
    }
}
