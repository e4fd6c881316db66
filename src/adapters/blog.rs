use crate::domain::model::{Article, PeriodType};
use crate::domain::ports::{ArticleSource, ConfigProvider};
use crate::utils::error::{RankingError, Result};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ENTRY_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"blog-entry-[0-9]+\.html$").unwrap());

/// Ranking articles published on the blog's category pages.
pub struct BlogArticleSource {
    client: Client,
    weekly_category_url: String,
    monthly_category_url: String,
}

impl BlogArticleSource {
    pub fn new(client: Client, weekly_category_url: String, monthly_category_url: String) -> Self {
        Self {
            client,
            weekly_category_url,
            monthly_category_url,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(
            client,
            config.category_url(PeriodType::Weekly).to_string(),
            config.category_url(PeriodType::Monthly).to_string(),
        ))
    }

    fn category_url(&self, period: PeriodType) -> &str {
        match period {
            PeriodType::Weekly => &self.weekly_category_url,
            PeriodType::Monthly => &self.monthly_category_url,
        }
    }

    async fn get_html(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl ArticleSource for BlogArticleSource {
    async fn latest_article_url(&self, period: PeriodType) -> Result<String> {
        let category_url = self.category_url(period);
        let html = self.get_html(category_url).await?;
        find_article_link(&html, category_url).ok_or_else(|| RankingError::ArticleNotFound {
            category_url: category_url.to_string(),
        })
    }

    async fn fetch_article(&self, url: &str) -> Result<Article> {
        let html = self.get_html(url).await?;
        Ok(parse_article(url, &html))
    }
}

/// First `blog-entry-N.html` link on a category page, made absolute.
pub fn find_article_link(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let links = Selector::parse("a[href]").unwrap();

    let href = document
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| ENTRY_LINK_RE.is_match(href))?;

    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::debug!("Could not resolve '{}' against {}: {}", href, base_url, e);
            Some(href.to_string())
        }
    }
}

pub fn parse_article(url: &str, html: &str) -> Article {
    let document = Html::parse_document(html);
    let header_selector = Selector::parse("h2.entry_header").unwrap();
    let body_selector = Selector::parse("div.entry_body").unwrap();

    let header = document
        .select(&header_selector)
        .next()
        .map(|h| h.text().collect::<String>());

    let body = document
        .select(&body_selector)
        .next()
        .map(|b| b.inner_html());

    let text = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Article {
        url: url.to_string(),
        header,
        text,
        body,
    }
}
