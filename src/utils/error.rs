use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("No article link found on category page: {category_url}")]
    ArticleNotFound { category_url: String },

    #[error("Baseline line not found")]
    BaselineNotFound,

    #[error("No baseline rank/sales pairs found")]
    NoBaselinePairs,

    #[error("Baseline has no breakpoints")]
    EmptyBaseline,

    #[error("Rank {rank} out of range: must be between 1 and {max}")]
    RankOutOfRange { rank: u32, max: u32 },

    #[error("Title lookup failed: {message}")]
    LookupError { message: String },

    #[error("Translation failed: {message}")]
    TranslationError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Parsing,
    Network,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RankingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RankingError::ArticleNotFound { .. } => ErrorCategory::Source,
            RankingError::BaselineNotFound
            | RankingError::NoBaselinePairs
            | RankingError::EmptyBaseline
            | RankingError::RankOutOfRange { .. } => ErrorCategory::Parsing,
            RankingError::LookupError { .. }
            | RankingError::TranslationError { .. }
            | RankingError::ApiError(_) => ErrorCategory::Network,
            RankingError::IoError(_) | RankingError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            RankingError::ConfigError { .. }
            | RankingError::ConfigValidationError { .. }
            | RankingError::InvalidConfigValueError { .. }
            | RankingError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆查詢失敗只會降級，不會中止
            RankingError::LookupError { .. } | RankingError::TranslationError { .. } => {
                ErrorSeverity::Low
            }
            RankingError::ApiError(_) => ErrorSeverity::Medium,
            RankingError::ArticleNotFound { .. }
            | RankingError::BaselineNotFound
            | RankingError::NoBaselinePairs
            | RankingError::EmptyBaseline
            | RankingError::RankOutOfRange { .. }
            | RankingError::ConfigError { .. }
            | RankingError::ConfigValidationError { .. }
            | RankingError::InvalidConfigValueError { .. }
            | RankingError::MissingConfigError { .. } => ErrorSeverity::High,
            RankingError::IoError(_) | RankingError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Source => {
                "Check that the category page URL is correct and still lists ranking articles"
            }
            ErrorCategory::Parsing => {
                "The article layout may have changed; inspect the article page manually"
            }
            ErrorCategory::Network => "Check your network connection and try again later",
            ErrorCategory::Storage => "Check that the output path is writable",
            ErrorCategory::Configuration => "Review the command line arguments and config file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RankingError::ArticleNotFound { .. } => {
                "Could not find the latest ranking article.".to_string()
            }
            RankingError::BaselineNotFound | RankingError::NoBaselinePairs => {
                "The article does not contain a usable sales baseline.".to_string()
            }
            RankingError::RankOutOfRange { rank, max } => format!(
                "Rank {} is outside the baseline range (1-{}); sales cannot be estimated.",
                rank, max
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankingError>;
