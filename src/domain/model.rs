use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ranking variant is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn from_monthly_flag(monthly: bool) -> Self {
        if monthly {
            PeriodType::Monthly
        } else {
            PeriodType::Weekly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
        }
    }

    pub fn default_output_file(&self) -> &'static str {
        match self {
            PeriodType::Weekly => "shoseki_weekly_ranking.json",
            PeriodType::Monthly => "shoseki_monthly_ranking.json",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (rank, sales) anchor of the published baseline curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselinePoint {
    pub rank: u32,
    pub sales: i64,
}

impl BaselinePoint {
    pub fn new(rank: u32, sales: i64) -> Self {
        Self { rank, sales }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRow {
    pub rank: u32,
    pub jp_title: String,
    pub volume: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    pub jp_date: Option<String>,
    pub en_date: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub week: Option<String>,
}

impl DateInfo {
    pub fn is_empty(&self) -> bool {
        self.jp_date.is_none()
    }
}

/// Provenance tag of a resolved title. Serialized names match earlier outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleSource {
    #[serde(rename = "anilist")]
    Lookup,
    #[serde(rename = "machine_translation")]
    Translation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleResolution {
    pub jp_title: String,
    pub en_title: String,
    pub source: TitleSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub jp_title: String,
    pub en_title: String,
    pub en_source: TitleSource,
    pub volume: Option<u32>,
    pub estimated_sales: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResult {
    pub category_type: PeriodType,
    pub date_info: DateInfo,
    pub total_entries: usize,
    pub rankings: Vec<RankingEntry>,
}

impl RankingResult {
    pub fn new(category_type: PeriodType, date_info: DateInfo, rankings: Vec<RankingEntry>) -> Self {
        Self {
            category_type,
            date_info,
            total_entries: rankings.len(),
            rankings,
        }
    }
}

/// A fetched ranking article, reduced to the parts the pipeline reads.
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub url: String,
    /// Text of the entry header, e.g. `2025年6/30-7/6 漫画ランキング`.
    pub header: Option<String>,
    /// Every text node of the page, trimmed, joined with `\n`.
    pub text: String,
    /// Inner markup of the entry body holding the ranking rows.
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub current: usize,
    pub total: usize,
}
