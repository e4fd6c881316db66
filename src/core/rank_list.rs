//! Ranking row extraction from the article body markup.
//!
//! Each row of the ranking table sits on its own `<br>`-separated line:
//!
//! ```text
//! 1 <a href="...">9784088845331</a> ワンピース　１１０ 集英社 尾田栄一郎 2025.07.04
//! ```
//!
//! that is: rank, an identifier link, the title, publisher, author and the
//! release date. Lines that do not have this exact shape are decoration and
//! are dropped.

use crate::domain::model::RankRow;

pub const MAX_RANK: u32 = 999;

/// Extracts ranking rows in markup order.
pub fn extract_rank_list(markup: &str) -> Vec<RankRow> {
    let rows: Vec<RankRow> = split_lines(markup)
        .into_iter()
        .filter_map(parse_row)
        .collect();
    tracing::debug!("Extracted {} ranking rows", rows.len());
    rows
}

/// Splits markup on `<br>`, `<br/>` and `<br />`, ignoring ASCII case.
pub fn split_lines(markup: &str) -> Vec<&str> {
    let lower = markup.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(found) = lower[search..].find("<br") {
        let at = search + found;
        let mut end = at + 3;
        while end < bytes.len() && bytes[end].is_ascii_whitespace() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'/' {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'>' {
            lines.push(&markup[start..at]);
            start = end + 1;
            search = start;
        } else {
            search = at + 3;
        }
    }
    lines.push(&markup[start..]);
    lines
}

/// Matches one candidate line against the row grammar.
pub fn parse_row(line: &str) -> Option<RankRow> {
    let line = line.trim();

    let (rank_digits, rest) = take_digits(line);
    if rank_digits.is_empty() || rank_digits.chars().count() > 3 {
        return None;
    }
    let rank: u32 = fold_width(rank_digits).parse().ok()?;
    if rank == 0 || rank > MAX_RANK {
        return None;
    }

    // identifier link: <a ...>digits</a>
    let rest = rest.trim_start().strip_prefix('<')?;
    let tag_end = rest.find('>')?;
    if tag_end == 0 {
        return None;
    }
    let (id_digits, rest) = take_digits(rest[tag_end + 1..].trim_start());
    if id_digits.is_empty() {
        return None;
    }
    let tail = expand_nbsp(rest.trim_start().strip_prefix("</a>")?);

    // title, publisher, author, date: the last three tokens are fixed
    let (rest, date) = split_last_token(tail.trim_start())?;
    if !is_release_date(&fold_width(date)) {
        return None;
    }
    let (rest, _author) = split_last_token(rest)?;
    let (raw_title, _publisher) = split_last_token(rest)?;
    if raw_title.is_empty() || raw_title.contains('<') {
        return None;
    }

    let jp_title = normalize_title(raw_title);
    if jp_title.is_empty() {
        return None;
    }
    let volume = trailing_volume(&jp_title);

    Some(RankRow {
        rank,
        jp_title,
        volume,
    })
}

/// Decodes entities, turns full-width spaces, Latin letters and digits into
/// ASCII, and trims.
pub fn normalize_title(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    decoded
        .replace('\u{3000}', " ")
        .trim()
        .chars()
        .map(to_ascii_width)
        .collect()
}

/// Maps full-width Latin letters and digits to their ASCII forms.
pub(crate) fn fold_width(s: &str) -> String {
    s.chars().map(to_ascii_width).collect()
}

fn to_ascii_width(c: char) -> char {
    match c {
        'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

/// Volume number when the title ends in whitespace followed by digits.
pub fn trailing_volume(title: &str) -> Option<u32> {
    let digits_start = title
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let before = title[..digits_start].chars().next_back()?;
    if !before.is_whitespace() {
        return None;
    }
    title[digits_start..].parse().ok().filter(|v| *v > 0)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

fn take_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_digit(c)).unwrap_or(s.len());
    s.split_at(end)
}

// Serialized markup writes U+00A0 as an entity; fields may be separated by it.
fn expand_nbsp(s: &str) -> String {
    ["&nbsp;", "&#160;", "&#xa0;", "&#xA0;"]
        .iter()
        .fold(s.to_string(), |acc, entity| acc.replace(entity, " "))
}

// Splits "head <ws> token" at the last whitespace run.
fn split_last_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_end();
    let (ws_at, ws) = s.char_indices().rev().find(|(_, c)| c.is_whitespace())?;
    let token = &s[ws_at + ws.len_utf8()..];
    let head = s[..ws_at].trim_end();
    if token.is_empty() {
        return None;
    }
    Some((head, token))
}

// YYYY.MM.DD
fn is_release_date(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 10
        && b[4] == b'.'
        && b[7] == b'.'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}
