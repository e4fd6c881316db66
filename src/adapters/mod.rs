// Adapters layer: reqwest-backed implementations of the domain ports.

pub mod anilist;
pub mod blog;
pub mod translate;

pub use anilist::AniListLookup;
pub use blog::BlogArticleSource;
pub use translate::GoogleTranslator;
