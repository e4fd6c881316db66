use crate::domain::ports::{ConfigProvider, TitleLookup};
use crate::utils::error::{RankingError, Result};
use reqwest::Client;
use serde_json::{json, Value};

pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";

/// AniList GraphQL client; one aliased `Page` query per title in a batch.
pub struct AniListLookup {
    client: Client,
    endpoint: String,
}

impl AniListLookup {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.lookup_timeout())
            .build()?;
        Ok(Self::new(client, config.lookup_endpoint().to_string()))
    }
}

#[async_trait::async_trait]
impl TitleLookup for AniListLookup {
    async fn lookup_batch(&self, queries: &[String]) -> Result<Vec<Option<String>>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({ "query": build_query(queries) });
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let value: Value = response.json().await?;
        parse_response(&value, queries.len())
    }
}

/// GraphQL document with aliases `manga_0`, `manga_1`, … in query order.
pub fn build_query(queries: &[String]) -> String {
    let mut doc = String::from("query {\n");
    for (i, search) in queries.iter().enumerate() {
        // JSON string literals are valid GraphQL string literals
        let literal = Value::String(search.clone()).to_string();
        doc.push_str(&format!(
            "  manga_{i}: Page(perPage: 1) {{\n    pageInfo {{ total }}\n    results: media(type: MANGA, search: {literal}) {{\n      title {{ english romaji }}\n    }}\n  }}\n"
        ));
    }
    doc.push('}');
    doc
}

/// English title per alias, falling back to romaji.
pub fn parse_response(value: &Value, count: usize) -> Result<Vec<Option<String>>> {
    let data = match value.get("data") {
        Some(data) if data.is_object() => data,
        _ => {
            let message = value
                .pointer("/errors/0/message")
                .and_then(Value::as_str)
                .unwrap_or("response has no data")
                .to_string();
            return Err(RankingError::LookupError { message });
        }
    };

    Ok((0..count)
        .map(|i| {
            let title = data
                .get(format!("manga_{}", i))?
                .pointer("/results/0/title")?;
            ["english", "romaji"]
                .iter()
                .filter_map(|key| title.get(*key).and_then(Value::as_str))
                .find(|t| !t.is_empty())
                .map(str::to_string)
        })
        .collect())
}
