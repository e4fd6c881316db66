use crate::domain::model::{DateInfo, PeriodType};
use chrono::Month;

/// Reads the ranking period out of an entry header.
///
/// Monthly headers look like `2025年5月 漫画ランキング`, weekly ones like
/// `2025年6/30-7/6 漫画ランキング`. A missing header or one that does not fit
/// the period's pattern yields an empty [`DateInfo`].
pub fn extract_date_info(header: Option<&str>, period: PeriodType) -> DateInfo {
    let Some(text) = header else {
        return DateInfo::default();
    };

    let found = match period {
        PeriodType::Monthly => find_monthly(text),
        PeriodType::Weekly => find_weekly(text),
    };

    match found {
        Some(info) => info,
        None => {
            tracing::warn!("Header does not match the {} date pattern: {}", period, text.trim());
            DateInfo::default()
        }
    }
}

fn find_monthly(text: &str) -> Option<DateInfo> {
    year_anchors(text).find_map(|(year, after)| {
        let (month, rest) = digits_between(after, 1, 2)?;
        rest.strip_prefix('月')?;
        let month_name = month_name(month)?;

        Some(DateInfo {
            jp_date: Some(format!("{}年{}月", year, month)),
            en_date: Some(format!("{} {}", month_name, year)),
            year: Some(year.to_string()),
            month: Some(month.to_string()),
            week: None,
        })
    })
}

fn find_weekly(text: &str) -> Option<DateInfo> {
    year_anchors(text).find_map(|(year, after)| {
        let (start_month, rest) = digits_between(after, 1, 2)?;
        let (start_day, rest) = digits_between(rest.strip_prefix('/')?, 1, 2)?;
        let (end_month, rest) = digits_between(rest.strip_prefix('-')?, 1, 2)?;
        let end_day = leading_digits(rest.strip_prefix('/')?, 2)?;

        let start_name = month_name(start_month)?;
        let end_name = month_name(end_month)?;
        let week = format!("{}/{}-{}/{}", start_month, start_day, end_month, end_day);

        Some(DateInfo {
            jp_date: Some(format!("{}年{}", year, week)),
            en_date: Some(format!(
                "{} {} - {} {}, {}",
                start_name, start_day, end_name, end_day, year
            )),
            year: Some(year.to_string()),
            month: None,
            week: Some(week),
        })
    })
}

// Every "YYYY年" in the text, as (year, text after 年), left to right.
fn year_anchors(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.match_indices('年').filter_map(move |(at, sep)| {
        let head = &text[..at];
        if head.len() < 4 {
            return None;
        }
        let year = head.get(head.len() - 4..)?;
        if !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((year, &text[at + sep.len()..]))
    })
}

// A digit run of length min..=max that is not followed by another digit.
fn digits_between(s: &str, min: usize, max: usize) -> Option<(&str, &str)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len < min || len > max {
        return None;
    }
    Some(s.split_at(len))
}

// Up to `max` leading digits, at least one; trailing digits are left alone.
fn leading_digits(s: &str, max: usize) -> Option<&str> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count().min(max);
    if len == 0 {
        return None;
    }
    Some(&s[..len])
}

fn month_name(month: &str) -> Option<&'static str> {
    let number: u8 = month.parse().ok()?;
    Month::try_from(number).ok().map(|m| m.name())
}
