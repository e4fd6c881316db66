use crate::domain::model::{TitleResolution, TitleSource};
use crate::domain::ports::{TitleLookup, Translator};
use std::collections::HashMap;

/// Upper bound on aliases per lookup query.
pub const LOOKUP_BATCH_SIZE: usize = 50;

/// Caches owned by a single pipeline run.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    lookups: HashMap<String, Option<String>>,
    resolved: HashMap<String, TitleResolution>,
    translations: usize,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_looked_up(&self, jp_title: &str) -> bool {
        self.lookups.contains_key(jp_title)
    }

    pub fn lookup_hit(&self, jp_title: &str) -> Option<&str> {
        self.lookups.get(jp_title).and_then(|v| v.as_deref())
    }

    pub fn translations(&self) -> usize {
        self.translations
    }
}

pub struct TitleResolver<L: TitleLookup, T: Translator> {
    lookup: L,
    translator: T,
    batch_size: usize,
}

impl<L: TitleLookup, T: Translator> TitleResolver<L, T> {
    pub fn new(lookup: L, translator: T) -> Self {
        Self {
            lookup,
            translator,
            batch_size: LOOKUP_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, LOOKUP_BATCH_SIZE);
        self
    }

    /// Queries the lookup service for every title not yet seen in this run.
    pub async fn lookup_all(&self, titles: &[String], ctx: &mut ResolutionContext) {
        let mut pending: Vec<&String> = Vec::new();
        for title in titles {
            if !ctx.was_looked_up(title) && !pending.contains(&title) {
                pending.push(title);
            }
        }
        if pending.is_empty() {
            return;
        }

        let batches = pending.len().div_ceil(self.batch_size);
        tracing::info!(
            "🔎 Looking up {} titles in {} batch(es)",
            pending.len(),
            batches
        );

        for (index, batch) in pending.chunks(self.batch_size).enumerate() {
            let queries: Vec<String> = batch.iter().map(|t| lookup_query(t)).collect();

            let answers = match self.lookup.lookup_batch(&queries).await {
                Ok(answers) if answers.len() == batch.len() => answers,
                Ok(answers) => {
                    tracing::warn!(
                        "Lookup batch {} returned {} answers for {} titles, ignoring it",
                        index + 1,
                        answers.len(),
                        batch.len()
                    );
                    vec![None; batch.len()]
                }
                Err(e) => {
                    tracing::warn!("Lookup batch {} failed: {}", index + 1, e);
                    vec![None; batch.len()]
                }
            };

            for (title, answer) in batch.iter().zip(answers) {
                let answer = answer.filter(|en| !en.trim().is_empty());
                ctx.lookups.insert((*title).clone(), answer);
            }
        }

        let hits = pending.iter().filter(|t| ctx.lookup_hit(t).is_some()).count();
        tracing::debug!("Lookup resolved {}/{} titles", hits, pending.len());
    }

    /// English title for `jp_title`, translating when the lookup had nothing.
    pub async fn resolve(&self, jp_title: &str, ctx: &mut ResolutionContext) -> TitleResolution {
        if let Some(done) = ctx.resolved.get(jp_title) {
            return done.clone();
        }

        let resolution = match ctx.lookup_hit(jp_title) {
            Some(en) => TitleResolution {
                jp_title: jp_title.to_string(),
                en_title: en.to_string(),
                source: TitleSource::Lookup,
            },
            None => {
                ctx.translations += 1;
                TitleResolution {
                    jp_title: jp_title.to_string(),
                    en_title: self.translate_or_passthrough(jp_title).await,
                    source: TitleSource::Translation,
                }
            }
        };

        ctx.resolved
            .insert(jp_title.to_string(), resolution.clone());
        resolution
    }

    async fn translate_or_passthrough(&self, jp_title: &str) -> String {
        match self.translator.translate(jp_title).await {
            Ok(en) if !en.trim().is_empty() => en,
            Ok(_) => {
                tracing::warn!("Empty translation for '{}', keeping original", jp_title);
                jp_title.to_string()
            }
            Err(e) => {
                tracing::warn!("Translation failed for '{}': {}", jp_title, e);
                jp_title.to_string()
            }
        }
    }
}

/// Drops a trailing volume number so the series itself is searched.
pub fn lookup_query(jp_title: &str) -> String {
    let trimmed = jp_title.trim_end();
    let without_digits = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() < trimmed.len()
        && without_digits.ends_with(char::is_whitespace)
    {
        without_digits.trim().to_string()
    } else {
        jp_title.trim().to_string()
    }
}
