pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{AniListLookup, BlogArticleSource, GoogleTranslator};
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::RankingEngine,
    pipeline::RankingPipeline,
    resolver::{ResolutionContext, TitleResolver},
};
pub use domain::model::{DateInfo, PeriodType, RankingEntry, RankingResult, TitleSource};
pub use utils::error::{RankingError, Result};
