use crate::core::rank_list::fold_width;
use crate::domain::model::BaselinePoint;
use crate::utils::error::{RankingError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Phrase introducing the baseline line ("rough sales estimate").
pub const BASELINE_MARKER: &str = "おおまかな実売目安";

static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9０-９]+)位([0-9０-９]+)").unwrap());

/// Parses the `※…おおまかな実売目安…` line of an article into breakpoints.
///
/// Pairs are read from the rest of the marker line and from the line after
/// it. The result is stably sorted by rank, so duplicate ranks keep the order
/// they were published in.
pub fn parse_baseline(text: &str) -> Result<Vec<BaselinePoint>> {
    let mut lines = text.lines();
    let mut scan = None;

    while let Some(line) = lines.next() {
        let Some(marker_at) = line.find(BASELINE_MARKER) else {
            continue;
        };
        if !line[..marker_at].contains('※') {
            continue;
        }
        let rest = &line[marker_at + BASELINE_MARKER.len()..];
        let next = lines.next().unwrap_or_default();
        scan = Some(format!("{}\n{}", rest, next));
        break;
    }

    let scan = scan.ok_or(RankingError::BaselineNotFound)?;

    let mut points: Vec<BaselinePoint> = PAIR_RE
        .captures_iter(&scan)
        .filter_map(|caps| {
            let rank = fold_width(&caps[1]).parse::<u32>().ok()?;
            let sales = fold_width(&caps[2]).parse::<i64>().ok()?;
            Some(BaselinePoint::new(rank, sales))
        })
        .collect();

    if points.is_empty() {
        return Err(RankingError::NoBaselinePairs);
    }

    points.sort_by_key(|p| p.rank);
    tracing::debug!("Parsed {} baseline breakpoints", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs_on_following_line() {
        let text = "週間ランキング\n※集計対象のおおまかな実売目安\n1位5000 10位1000 50位200\n以下略";
        let points = parse_baseline(text).unwrap();
        assert_eq!(
            points,
            vec![
                BaselinePoint::new(1, 5000),
                BaselinePoint::new(10, 1000),
                BaselinePoint::new(50, 200),
            ]
        );
    }

    #[test]
    fn test_parse_pairs_on_marker_line_are_sorted() {
        let text = "※おおまかな実売目安：50位200 1位5000 10位1000";
        let points = parse_baseline(text).unwrap();
        let ranks: Vec<u32> = points.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 10, 50]);
    }

    #[test]
    fn test_duplicate_ranks_keep_published_order() {
        let text = "※おおまかな実売目安\n10位900 1位5000 10位1000";
        let points = parse_baseline(text).unwrap();
        assert_eq!(
            points,
            vec![
                BaselinePoint::new(1, 5000),
                BaselinePoint::new(10, 900),
                BaselinePoint::new(10, 1000),
            ]
        );
    }

    #[test]
    fn test_full_width_digits() {
        let text = "※おおまかな実売目安\n１位５０００ １０位１０００ 50位２００";
        let points = parse_baseline(text).unwrap();
        assert_eq!(
            points,
            vec![
                BaselinePoint::new(1, 5000),
                BaselinePoint::new(10, 1000),
                BaselinePoint::new(50, 200),
            ]
        );
    }

    #[test]
    fn test_missing_marker() {
        let err = parse_baseline("1位5000 10位1000").unwrap_err();
        assert!(matches!(err, RankingError::BaselineNotFound));
    }

    #[test]
    fn test_marker_without_asterisk_is_ignored() {
        let err = parse_baseline("おおまかな実売目安\n1位5000").unwrap_err();
        assert!(matches!(err, RankingError::BaselineNotFound));
    }

    #[test]
    fn test_marker_without_pairs() {
        let err = parse_baseline("※おおまかな実売目安は後日\n準備中").unwrap_err();
        assert!(matches!(err, RankingError::NoBaselinePairs));
    }

    #[test]
    fn test_pairs_beyond_next_line_are_not_read() {
        let text = "※おおまかな実売目安\n1位5000\n前週10位";
        let points = parse_baseline(text).unwrap();
        assert_eq!(points, vec![BaselinePoint::new(1, 5000)]);
    }
}
