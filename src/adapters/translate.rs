use crate::domain::ports::{ConfigProvider, Translator};
use crate::utils::error::{RankingError, Result};
use reqwest::Client;
use serde_json::Value;

pub const GOOGLE_TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google Translate `gtx` client.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    source: String,
    target: String,
}

impl GoogleTranslator {
    pub fn new(client: Client, endpoint: String, source: String, target: String) -> Self {
        Self {
            client,
            endpoint,
            source,
            target,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .build()?;
        let (source, target) = config.translation_languages();
        Ok(Self::new(
            client,
            config.translate_endpoint().to_string(),
            source.to_string(),
            target.to_string(),
        ))
    }
}

#[async_trait::async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let value: Value = response.json().await?;
        parse_translation(&value).ok_or_else(|| RankingError::TranslationError {
            message: format!("unexpected response for '{}'", text),
        })
    }
}

/// Joins the translated segments of a `translate_a/single` response.
///
/// The payload is `[[["translated", "original", ...], ...], ...]`.
pub fn parse_translation(value: &Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
