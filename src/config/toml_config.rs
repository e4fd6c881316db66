use crate::adapters::anilist::ANILIST_ENDPOINT;
use crate::adapters::translate::GOOGLE_TRANSLATE_ENDPOINT;
use crate::core::resolver::LOOKUP_BATCH_SIZE;
use crate::domain::model::PeriodType;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RankingError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const WEEKLY_CATEGORY_URL: &str = "http://shosekiranking.blog.fc2.com/blog-category-6.html";
pub const MONTHLY_CATEGORY_URL: &str = "http://shosekiranking.blog.fc2.com/blog-category-4.html";

/// Settings file. Every section and key is optional; missing values fall
/// back to the public endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub lookup: LookupConfig,
    pub translation: TranslationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub weekly_category_url: String,
    pub monthly_category_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            weekly_category_url: WEEKLY_CATEGORY_URL.to_string(),
            monthly_category_url: MONTHLY_CATEGORY_URL.to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub endpoint: String,
    pub batch_size: usize,
    pub timeout_seconds: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: ANILIST_ENDPOINT.to_string(),
            batch_size: LOOKUP_BATCH_SIZE,
            timeout_seconds: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub source_language: String,
    pub target_language: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_TRANSLATE_ENDPOINT.to_string(),
            source_language: "ja".to_string(),
            target_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RankingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RankingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ANILIST_ENDPOINT})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.weekly_category_url", &self.source.weekly_category_url)?;
        validation::validate_url("source.monthly_category_url", &self.source.monthly_category_url)?;
        validation::validate_url("lookup.endpoint", &self.lookup.endpoint)?;
        validation::validate_url("translation.endpoint", &self.translation.endpoint)?;
        validation::validate_path("output.directory", &self.output.directory)?;

        validation::validate_range("lookup.batch_size", self.lookup.batch_size, 1, LOOKUP_BATCH_SIZE)?;
        validation::validate_positive_number(
            "source.timeout_seconds",
            self.source.timeout_seconds as usize,
            1,
        )?;
        validation::validate_positive_number(
            "lookup.timeout_seconds",
            self.lookup.timeout_seconds as usize,
            1,
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn category_url(&self, period: PeriodType) -> &str {
        match period {
            PeriodType::Weekly => &self.source.weekly_category_url,
            PeriodType::Monthly => &self.source.monthly_category_url,
        }
    }

    fn lookup_endpoint(&self) -> &str {
        &self.lookup.endpoint
    }

    fn translate_endpoint(&self) -> &str {
        &self.translation.endpoint
    }

    fn batch_size(&self) -> usize {
        self.lookup.batch_size
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup.timeout_seconds)
    }

    fn translation_languages(&self) -> (&str, &str) {
        (
            &self.translation.source_language,
            &self.translation.target_language,
        )
    }

    fn user_agent(&self) -> &str {
        &self.source.user_agent
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.category_url(PeriodType::Weekly), WEEKLY_CATEGORY_URL);
        assert_eq!(config.category_url(PeriodType::Monthly), MONTHLY_CATEGORY_URL);
        assert_eq!(config.lookup_endpoint(), ANILIST_ENDPOINT);
        assert_eq!(config.batch_size(), 50);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.lookup_timeout(), Duration::from_secs(8));
        assert_eq!(config.translation_languages(), ("ja", "en"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[source]
weekly_category_url = "http://localhost:8080/blog-category-6.html"

[lookup]
batch_size = 10
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.category_url(PeriodType::Weekly),
            "http://localhost:8080/blog-category-6.html"
        );
        assert_eq!(config.category_url(PeriodType::Monthly), MONTHLY_CATEGORY_URL);
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.user_agent(), "Mozilla/5.0");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHOSEKI_TEST_LOOKUP", "https://lookup.test/graphql");

        let toml_content = r#"
[lookup]
endpoint = "${SHOSEKI_TEST_LOOKUP}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.lookup_endpoint(), "https://lookup.test/graphql");

        std::env::remove_var("SHOSEKI_TEST_LOOKUP");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = TomlConfig::from_toml_str(
            r#"
[translation]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(invalid_url.validate().is_err());

        let oversized_batch = TomlConfig::from_toml_str(
            r#"
[lookup]
batch_size = 51
"#,
        )
        .unwrap();
        assert!(oversized_batch.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = TomlConfig::from_toml_str("[source\nweekly = 1").unwrap_err();
        assert!(matches!(err, RankingError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
directory = "./rankings"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.directory, "./rankings");
    }
}
