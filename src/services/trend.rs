use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    db::FavoriteStore,
    error::AppResult,
    models::{TrendInterval, TrendPoint},
};

use super::normalize_cocktail_id;

/// Per-period favorite counts for one cocktail over a recent window
#[derive(Clone)]
pub struct TrendService {
    store: Arc<dyn FavoriteStore>,
}

impl TrendService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Buckets the cocktail's recent favorites by day or month
    ///
    /// The id is trimmed and must not be blank. Only periods with at least one
    /// favorite are returned, oldest first.
    /// Callers must not assume the series is contiguous.
    pub async fn trend(
        &self,
        cocktail_id: &str,
        interval: TrendInterval,
    ) -> AppResult<Vec<TrendPoint>> {
        self.trend_as_of(cocktail_id, interval, Utc::now()).await
    }

    pub(crate) async fn trend_as_of(
        &self,
        cocktail_id: &str,
        interval: TrendInterval,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<TrendPoint>> {
        let cocktail_id = normalize_cocktail_id(cocktail_id)?;
        let since = interval.window_start(now);
        let favorites = self.store.list_by_cocktail_since(cocktail_id, since).await?;

        let mut buckets: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
        for favorite in &favorites {
            *buckets
                .entry(interval.bucket_start(favorite.favorited_at))
                .or_insert(0) += 1;
        }

        tracing::info!(
            cocktail_id = %cocktail_id,
            interval = %interval,
            since = %since,
            favorites = favorites.len(),
            buckets = buckets.len(),
            "Computed cocktail trend"
        );

        Ok(buckets
            .into_iter()
            .map(|(period, count)| TrendPoint { period, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryFavoriteStore;
    use chrono::{TimeDelta, TimeZone};
    use uuid::Uuid;

    async fn seed(store: &InMemoryFavoriteStore, cocktail_id: &str, at: DateTime<Utc>) {
        store.insert_at(Uuid::new_v4(), cocktail_id, at).await.unwrap();
    }

    #[tokio::test]
    async fn test_daily_window_excludes_old_favorites() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let now = Utc::now();
        seed(&store, "mojito", now - TimeDelta::days(40)).await;
        seed(&store, "mojito", now - TimeDelta::days(5)).await;

        let service = TrendService::new(store);
        let trend = service.trend("mojito", TrendInterval::Day).await.unwrap();

        assert_eq!(trend.len(), 1);
        assert_eq!(
            trend[0].period,
            TrendInterval::Day.bucket_start(now - TimeDelta::days(5))
        );
        assert_eq!(trend[0].count, 1);
    }

    #[tokio::test]
    async fn test_daily_buckets_sorted_and_sparse() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        seed(&store, "negroni", Utc.with_ymd_and_hms(2025, 6, 14, 23, 0, 0).unwrap()).await;
        seed(&store, "negroni", Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()).await;
        seed(&store, "negroni", Utc.with_ymd_and_hms(2025, 6, 14, 1, 0, 0).unwrap()).await;
        seed(&store, "spritz", Utc.with_ymd_and_hms(2025, 6, 14, 1, 0, 0).unwrap()).await;

        let service = TrendService::new(store);
        let trend = service
            .trend_as_of("negroni", TrendInterval::Day, now)
            .await
            .unwrap();

        assert_eq!(
            trend,
            vec![
                TrendPoint {
                    period: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
                    count: 1,
                },
                TrendPoint {
                    period: Utc.with_ymd_and_hms(2025, 6, 14, 0, 0, 0).unwrap(),
                    count: 2,
                },
            ]
        );
        assert!(trend.windows(2).all(|w| w[0].period < w[1].period));
    }

    #[tokio::test]
    async fn test_monthly_buckets_cover_twelve_months() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        seed(&store, "mojito", Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()).await;
        seed(&store, "mojito", Utc.with_ymd_and_hms(2024, 7, 3, 0, 0, 0).unwrap()).await;
        seed(&store, "mojito", Utc.with_ymd_and_hms(2024, 7, 30, 0, 0, 0).unwrap()).await;
        seed(&store, "mojito", Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()).await;

        let service = TrendService::new(store);
        let trend = service
            .trend_as_of("mojito", TrendInterval::Month, now)
            .await
            .unwrap();

        assert_eq!(
            trend,
            vec![
                TrendPoint {
                    period: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
                    count: 2,
                },
                TrendPoint {
                    period: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
                    count: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_cocktail_has_empty_trend() {
        let service = TrendService::new(Arc::new(InMemoryFavoriteStore::new()));
        let trend = service.trend("unknown", TrendInterval::Month).await.unwrap();
        assert!(trend.is_empty());
    }

    #[tokio::test]
    async fn test_cocktail_id_is_trimmed() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let now = Utc::now();
        seed(&store, "mojito", now - TimeDelta::days(1)).await;

        let service = TrendService::new(store);
        let trend = service.trend(" mojito\t", TrendInterval::Day).await.unwrap();

        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].count, 1);
    }

    #[tokio::test]
    async fn test_blank_cocktail_id_rejected() {
        let service = TrendService::new(Arc::new(InMemoryFavoriteStore::new()));

        let err = service.trend("   ", TrendInterval::Month).await.unwrap_err();

        assert!(matches!(err, crate::error::AppError::InvalidInput(_)));
    }
}
