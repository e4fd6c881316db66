use crate::domain::model::{Article, PeriodType, ProgressEvent};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn category_url(&self, period: PeriodType) -> &str;
    fn lookup_endpoint(&self) -> &str;
    fn translate_endpoint(&self) -> &str;
    fn batch_size(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn lookup_timeout(&self) -> Duration;
    /// (source, target) language codes.
    fn translation_languages(&self) -> (&str, &str);
    fn user_agent(&self) -> &str;
}

/// Where ranking articles come from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// URL of the newest article listed for `period`.
    async fn latest_article_url(&self, period: PeriodType) -> Result<String>;
    async fn fetch_article(&self, url: &str) -> Result<Article>;
}

/// Batched title database lookup.
///
/// Returns one slot per query, in query order. An `Err` means the whole batch
/// failed; callers downgrade every title in it.
#[async_trait]
pub trait TitleLookup: Send + Sync {
    async fn lookup_batch(&self, queries: &[String]) -> Result<Vec<Option<String>>>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

pub type ProgressSender = tokio::sync::mpsc::UnboundedSender<ProgressEvent>;
pub type ProgressReceiver = tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
