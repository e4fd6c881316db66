pub mod baseline;
pub mod date_info;
pub mod engine;
pub mod estimator;
pub mod pipeline;
pub mod rank_list;
pub mod resolver;

pub use crate::domain::model::{
    Article, BaselinePoint, DateInfo, PeriodType, ProgressEvent, RankRow, RankingEntry,
    RankingResult, TitleResolution, TitleSource,
};
pub use crate::domain::ports::{ArticleSource, ConfigProvider, Storage, TitleLookup, Translator};
pub use crate::utils::error::Result;
