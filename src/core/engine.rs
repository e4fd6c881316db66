use crate::core::pipeline::RankingPipeline;
use crate::domain::model::{PeriodType, RankingResult};
use crate::domain::ports::{ArticleSource, Storage, TitleLookup, Translator};
use crate::utils::error::Result;

/// Runs one ranking pipeline and stores its JSON document.
pub struct RankingEngine<A: ArticleSource, L: TitleLookup, T: Translator, S: Storage> {
    pipeline: RankingPipeline<A, L, T>,
    storage: S,
}

impl<A, L, T, S> RankingEngine<A, L, T, S>
where
    A: ArticleSource,
    L: TitleLookup,
    T: Translator,
    S: Storage,
{
    pub fn new(pipeline: RankingPipeline<A, L, T>, storage: S) -> Self {
        Self { pipeline, storage }
    }

    /// Returns the stored result together with the path it was written to.
    pub async fn run(
        &self,
        limit: u32,
        period: PeriodType,
        file_name: &str,
    ) -> Result<(RankingResult, String)> {
        tracing::info!("🚀 Scraping {} ranking (limit {})", period, limit);
        let result = self.pipeline.run(limit, period).await?;

        tracing::debug!("Serializing {} entries", result.total_entries);
        let document = render_document(&result)?;

        let path = self.storage.write_file(file_name, document.as_bytes()).await?;
        tracing::info!("📁 Output saved to: {}", path);

        Ok((result, path))
    }
}

/// Pretty JSON with non-ASCII text kept as is.
pub fn render_document(result: &RankingResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::TitleResolver;
    use crate::domain::model::Article;
    use crate::utils::error::RankingError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("mock/{}", path))
        }
    }

    struct FixedSource(Option<Article>);

    #[async_trait::async_trait]
    impl ArticleSource for FixedSource {
        async fn latest_article_url(&self, _period: PeriodType) -> Result<String> {
            self.0
                .as_ref()
                .map(|a| a.url.clone())
                .ok_or(RankingError::ArticleNotFound {
                    category_url: "http://blog.example/blog-category-4.html".to_string(),
                })
        }

        async fn fetch_article(&self, _url: &str) -> Result<Article> {
            Ok(self.0.clone().unwrap_or_default())
        }
    }

    struct NoLookup;

    #[async_trait::async_trait]
    impl TitleLookup for NoLookup {
        async fn lookup_batch(&self, queries: &[String]) -> Result<Vec<Option<String>>> {
            Ok(vec![None; queries.len()])
        }
    }

    struct Echo;

    #[async_trait::async_trait]
    impl Translator for Echo {
        async fn translate(&self, text: &str) -> Result<String> {
            Ok(text.to_string())
        }
    }

    fn monthly_article() -> Article {
        Article {
            url: "http://blog.example/blog-entry-7.html".to_string(),
            header: Some("2025年5月 漫画ランキング".to_string()),
            text: "※月間のおおまかな実売目安\n1位90000 100位3000".to_string(),
            body: Some(
                "1 <a href=\"x\">9784088845331</a> ワンピース　１１０ 集英社 尾田栄一郎 2025.05.02<br />"
                    .to_string(),
            ),
        }
    }

    fn engine(
        article: Option<Article>,
        storage: MockStorage,
    ) -> RankingEngine<FixedSource, NoLookup, Echo, MockStorage> {
        let pipeline = RankingPipeline::new(FixedSource(article), TitleResolver::new(NoLookup, Echo));
        RankingEngine::new(pipeline, storage)
    }

    #[tokio::test]
    async fn test_run_writes_document() {
        let storage = MockStorage::new();
        let engine = engine(Some(monthly_article()), storage.clone());

        let (result, path) = engine
            .run(500, PeriodType::Monthly, "shoseki_monthly_ranking.json")
            .await
            .unwrap();

        assert_eq!(path, "mock/shoseki_monthly_ranking.json");
        assert_eq!(result.total_entries, 1);

        let bytes = storage.get_file("shoseki_monthly_ranking.json").await.unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"jp_title\": \"ワンピース 110\""));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["category_type"], "monthly");
        assert_eq!(json["date_info"]["en_date"], "May 2025");
        assert_eq!(json["rankings"][0]["en_source"], "machine_translation");
        assert_eq!(json["rankings"][0]["estimated_sales"], 90000);
    }

    #[tokio::test]
    async fn test_fatal_error_writes_nothing() {
        let storage = MockStorage::new();
        let engine = engine(None, storage.clone());

        let result = engine.run(10, PeriodType::Monthly, "out.json").await;

        assert!(matches!(result, Err(RankingError::ArticleNotFound { .. })));
        assert!(storage.get_file("out.json").await.is_none());
    }
}
