use crate::core::baseline::parse_baseline;
use crate::core::date_info::extract_date_info;
use crate::core::estimator::SalesEstimator;
use crate::core::rank_list::extract_rank_list;
use crate::core::resolver::{ResolutionContext, TitleResolver};
use crate::domain::model::{Article, PeriodType, ProgressEvent, RankRow, RankingEntry, RankingResult};
use crate::domain::ports::{ArticleSource, ProgressSender, TitleLookup, Translator};
use crate::utils::error::{RankingError, Result};
use std::collections::HashSet;

pub struct RankingPipeline<A: ArticleSource, L: TitleLookup, T: Translator> {
    source: A,
    resolver: TitleResolver<L, T>,
    progress: Option<ProgressSender>,
}

impl<A: ArticleSource, L: TitleLookup, T: Translator> RankingPipeline<A, L, T> {
    pub fn new(source: A, resolver: TitleResolver<L, T>) -> Self {
        Self {
            source,
            resolver,
            progress: None,
        }
    }

    /// Sends a [`ProgressEvent`] after every assembled entry.
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Some(progress);
        self
    }

    pub async fn run(&self, limit: u32, period: PeriodType) -> Result<RankingResult> {
        if limit == 0 {
            return Err(RankingError::InvalidConfigValueError {
                field: "limit".to_string(),
                value: limit.to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }

        // 取得最新文章
        let url = self.source.latest_article_url(period).await?;
        tracing::info!("📰 Latest {} article: {}", period, url);
        let article = self.source.fetch_article(&url).await?;

        self.build(&article, limit, period).await
    }

    /// Turns an already fetched article into the ranking result.
    pub async fn build(
        &self,
        article: &Article,
        limit: u32,
        period: PeriodType,
    ) -> Result<RankingResult> {
        let date_info = extract_date_info(article.header.as_deref(), period);
        if date_info.is_empty() {
            tracing::warn!("No date information found in article header");
        }

        let estimator = SalesEstimator::new(parse_baseline(&article.text)?)?;

        let rows = match article.body.as_deref() {
            Some(body) => extract_rank_list(body),
            None => {
                tracing::warn!("Article has no ranking body: {}", article.url);
                Vec::new()
            }
        };
        tracing::info!("Found {} ranks in the article", rows.len());

        let mut ctx = ResolutionContext::new();
        self.resolver.lookup_all(&unique_titles(&rows), &mut ctx).await;

        let total = rows.iter().filter(|r| r.rank <= limit).count();
        let mut rankings = Vec::with_capacity(total);

        for row in rows.iter().filter(|r| r.rank <= limit) {
            let estimated_sales = estimator.estimate(row.rank)?;
            let title = self.resolver.resolve(&row.jp_title, &mut ctx).await;

            rankings.push(RankingEntry {
                rank: row.rank,
                jp_title: title.jp_title,
                en_title: title.en_title,
                en_source: title.source,
                volume: row.volume,
                estimated_sales,
            });
            self.report(rankings.len(), total);
        }

        tracing::info!(
            "✅ Assembled {} entries ({} machine translated)",
            rankings.len(),
            ctx.translations()
        );

        Ok(RankingResult::new(period, date_info, rankings))
    }

    fn report(&self, current: usize, total: usize) {
        if let Some(tx) = &self.progress {
            // 接收端關閉時忽略
            let _ = tx.send(ProgressEvent { current, total });
        }
    }
}

/// Distinct titles in first-seen order.
pub fn unique_titles(rows: &[RankRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.jp_title.as_str()))
        .map(|row| row.jp_title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TitleSource;
    use crate::domain::ports::progress_channel;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const HEADER: &str = "2025年6/30-7/6 漫画ランキング";

    fn article(rows: &[(u32, &str)]) -> Article {
        let mut body = String::from("※おおまかな実売目安<br />1位5000 10位1000 50位200<br />\n");
        for (rank, title) in rows {
            body.push_str(&format!(
                "{} <a href=\"https://example.com/{}\">978408800000{}</a> {} 集英社 作者 2025.07.04<br />\n",
                rank, rank, rank, title
            ));
        }
        Article {
            url: "http://blog.example/blog-entry-1.html".to_string(),
            header: Some(HEADER.to_string()),
            text: "週間ランキング\n※おおまかな実売目安\n1位5000 10位1000 50位200".to_string(),
            body: Some(body),
        }
    }

    #[derive(Clone)]
    struct MockSource {
        article: Option<Article>,
        fetched: Arc<Mutex<Vec<String>>>,
    }

    impl MockSource {
        fn new(article: Option<Article>) -> Self {
            Self {
                article,
                fetched: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait::async_trait]
    impl ArticleSource for MockSource {
        async fn latest_article_url(&self, _period: PeriodType) -> Result<String> {
            match &self.article {
                Some(a) => Ok(a.url.clone()),
                None => Err(RankingError::ArticleNotFound {
                    category_url: "http://blog.example/blog-category-6.html".to_string(),
                }),
            }
        }

        async fn fetch_article(&self, url: &str) -> Result<Article> {
            self.fetched.lock().await.push(url.to_string());
            self.article.clone().ok_or(RankingError::ArticleNotFound {
                category_url: url.to_string(),
            })
        }
    }

    struct MapLookup(HashMap<String, String>);

    #[async_trait::async_trait]
    impl TitleLookup for MapLookup {
        async fn lookup_batch(&self, queries: &[String]) -> Result<Vec<Option<String>>> {
            Ok(queries.iter().map(|q| self.0.get(q).cloned()).collect())
        }
    }

    struct UpperTranslator;

    #[async_trait::async_trait]
    impl Translator for UpperTranslator {
        async fn translate(&self, text: &str) -> Result<String> {
            Ok(format!("[{}]", text))
        }
    }

    fn pipeline(article: Option<Article>) -> RankingPipeline<MockSource, MapLookup, UpperTranslator> {
        let known = HashMap::from([("ワンピース".to_string(), "One Piece".to_string())]);
        RankingPipeline::new(
            MockSource::new(article),
            TitleResolver::new(MapLookup(known), UpperTranslator),
        )
    }

    fn five_rows() -> Article {
        article(&[
            (1, "ワンピース 110"),
            (2, "呪術廻戦 30"),
            (3, "ワンピース 109"),
            (4, "ブルーロック 32"),
            (5, "薬屋のひとりごと 14"),
        ])
    }

    #[tokio::test]
    async fn test_limit_keeps_first_ranks_in_order() {
        let result = pipeline(Some(five_rows()))
            .run(3, PeriodType::Weekly)
            .await
            .unwrap();

        assert_eq!(result.total_entries, 3);
        assert_eq!(result.rankings.len(), 3);
        let ranks: Vec<u32> = result.rankings.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(result.category_type, PeriodType::Weekly);
        assert_eq!(result.date_info.week.as_deref(), Some("6/30-7/6"));
    }

    #[tokio::test]
    async fn test_entries_carry_titles_and_sales() {
        let result = pipeline(Some(five_rows()))
            .run(10, PeriodType::Weekly)
            .await
            .unwrap();

        let first = &result.rankings[0];
        assert_eq!(first.en_title, "One Piece");
        assert_eq!(first.en_source, TitleSource::Lookup);
        assert_eq!(first.volume, Some(110));
        assert_eq!(first.estimated_sales, 5000);

        let second = &result.rankings[1];
        assert_eq!(second.en_title, "[呪術廻戦 30]");
        assert_eq!(second.en_source, TitleSource::Translation);
        // 5000 - 4000 * 1/9
        assert_eq!(second.estimated_sales, 4555);

        assert_eq!(result.rankings[2].en_title, "One Piece");
    }

    #[tokio::test]
    async fn test_progress_events() {
        let (tx, mut rx) = progress_channel();
        let pipeline = pipeline(Some(five_rows())).with_progress(tx);

        pipeline.run(4, PeriodType::Weekly).await.unwrap();
        drop(pipeline);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ProgressEvent { current: 1, total: 4 });
        assert_eq!(events[3], ProgressEvent { current: 4, total: 4 });
    }

    #[tokio::test]
    async fn test_rank_beyond_baseline_aborts() {
        let article = article(&[(1, "ワンピース 110"), (51, "呪術廻戦 30")]);
        let err = pipeline(Some(article))
            .run(100, PeriodType::Weekly)
            .await
            .unwrap_err();
        assert!(matches!(err, RankingError::RankOutOfRange { rank: 51, max: 50 }));
    }

    #[tokio::test]
    async fn test_missing_article() {
        let err = pipeline(None).run(5, PeriodType::Monthly).await.unwrap_err();
        assert!(matches!(err, RankingError::ArticleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_baseline() {
        let mut article = five_rows();
        article.text = "週間ランキング".to_string();
        let err = pipeline(Some(article))
            .run(5, PeriodType::Weekly)
            .await
            .unwrap_err();
        assert!(matches!(err, RankingError::BaselineNotFound));
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let err = pipeline(Some(five_rows()))
            .run(0, PeriodType::Weekly)
            .await
            .unwrap_err();
        assert!(matches!(err, RankingError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_monthly_header_mismatch_is_not_fatal() {
        let result = pipeline(Some(five_rows()))
            .run(2, PeriodType::Monthly)
            .await
            .unwrap();
        assert!(result.date_info.is_empty());
        assert_eq!(result.category_type, PeriodType::Monthly);
        assert_eq!(result.total_entries, 2);
    }

    #[test]
    fn test_unique_titles_first_seen_order() {
        let rows = vec![
            RankRow { rank: 1, jp_title: "B".to_string(), volume: None },
            RankRow { rank: 2, jp_title: "A".to_string(), volume: None },
            RankRow { rank: 3, jp_title: "B".to_string(), volume: None },
        ];
        assert_eq!(unique_titles(&rows), vec!["B".to_string(), "A".to_string()]);
    }
}
