use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Values accepted for the size of the popularity ranking
pub const ALLOWED_TOP: [i32; 6] = [1, 3, 5, 10, 20, 50];

/// Ranking size used when the caller does not pick one
pub const DEFAULT_TOP: i32 = 10;

/// Recommendation count used when the caller's limit is missing or not positive
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// A cocktail together with how many favorites back it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CocktailCount {
    pub cocktail_id: String,
    pub count: u64,
}

impl CocktailCount {
    pub fn new(cocktail_id: impl Into<String>, count: u64) -> Self {
        Self {
            cocktail_id: cocktail_id.into(),
            count,
        }
    }
}

/// Counts occurrences per cocktail and keeps the `take` most frequent
///
/// Sorted by descending count; equal counts are ordered by ascending cocktail id.
pub fn rank_by_count<'a, I>(cocktail_ids: I, take: usize) -> Vec<CocktailCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for cocktail_id in cocktail_ids {
        *counts.entry(cocktail_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(take)
        .map(|(cocktail_id, count)| CocktailCount::new(cocktail_id, count))
        .collect()
}

/// Calendar period used to bucket a cocktail's favorites
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendInterval {
    #[default]
    Day,
    Month,
}

impl TrendInterval {
    /// Parses an interval name, falling back to `Day` for anything unknown
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some("month") => TrendInterval::Month,
            _ => TrendInterval::Day,
        }
    }

    /// Oldest timestamp still inside the window ending at `now`
    ///
    /// Thirty days back for daily buckets, twelve calendar months for monthly ones.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TrendInterval::Day => now - TimeDelta::days(30),
            TrendInterval::Month => now
                .checked_sub_months(Months::new(12))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Start of the bucket containing `at`, as UTC midnight
    pub fn bucket_start(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let date = at.date_naive();
        let start = match self {
            TrendInterval::Day => date,
            TrendInterval::Month => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
            }
        };
        start.and_time(NaiveTime::MIN).and_utc()
    }
}

impl Display for TrendInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendInterval::Day => write!(f, "day"),
            TrendInterval::Month => write!(f, "month"),
        }
    }
}

/// Number of favorites a cocktail received in one calendar period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub period: DateTime<Utc>,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_lenient_defaults_to_day() {
        assert_eq!(TrendInterval::parse_lenient(Some("month")), TrendInterval::Month);
        assert_eq!(TrendInterval::parse_lenient(Some("day")), TrendInterval::Day);
        assert_eq!(TrendInterval::parse_lenient(Some("week")), TrendInterval::Day);
        assert_eq!(TrendInterval::parse_lenient(Some("MONTH")), TrendInterval::Day);
        assert_eq!(TrendInterval::parse_lenient(None), TrendInterval::Day);
    }

    #[test]
    fn test_day_bucket_truncates_time() {
        let at = Utc.with_ymd_and_hms(2025, 5, 12, 17, 45, 3).unwrap();
        let bucket = TrendInterval::Day.bucket_start(at);
        assert_eq!(bucket, Utc.with_ymd_and_hms(2025, 5, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_bucket_is_first_of_month() {
        let at = Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 59).unwrap();
        let bucket = TrendInterval::Month.bucket_start(at);
        assert_eq!(bucket, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();

        assert_eq!(
            TrendInterval::Day.window_start(now),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(
            TrendInterval::Month.window_start(now),
            Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_rank_by_count_orders_and_truncates() {
        let ids = ["mojito", "margarita", "negroni", "margarita", "mojito", "margarita"];
        let ranked = rank_by_count(ids, 2);

        assert_eq!(
            ranked,
            vec![
                CocktailCount::new("margarita", 3),
                CocktailCount::new("mojito", 2),
            ]
        );
    }

    #[test]
    fn test_rank_by_count_breaks_ties_by_id() {
        let ids = ["sour", "bellini", "mule"];
        let ranked = rank_by_count(ids, 10);

        let order: Vec<&str> = ranked.iter().map(|c| c.cocktail_id.as_str()).collect();
        assert_eq!(order, vec!["bellini", "mule", "sour"]);
    }

    #[test]
    fn test_rank_by_count_empty() {
        assert!(rank_by_count(Vec::<&str>::new(), 5).is_empty());
    }

    #[test]
    fn test_cocktail_count_serialization() {
        let json = serde_json::to_value(CocktailCount::new("margarita", 2)).unwrap();
        assert_eq!(json["cocktailId"], "margarita");
        assert_eq!(json["count"], 2);
    }
}
