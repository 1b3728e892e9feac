use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    db::FavoriteStore,
    error::AppResult,
    models::{rank_by_count, CocktailCount, DEFAULT_RECOMMENDATION_LIMIT},
};

/// Generates cocktail suggestions by one-hop collaborative filtering
///
/// 1. Collect the cocktails the user already favorites
/// 2. Find other users who favorite at least one of them ("similar users")
/// 3. Count how many of those users' favorites land on each cocktail the user
///    does not have yet
/// 4. Return the most frequent, ties broken by cocktail id
///
/// A user without favorites, or without any similar user, gets no suggestions.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn FavoriteStore>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    pub async fn recommend(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<CocktailCount>> {
        let start = Instant::now();
        let limit = effective_limit(limit);

        let my_cocktails: HashSet<String> = self
            .store
            .list_by_user(user_id)
            .await?
            .into_iter()
            .map(|f| f.cocktail_id)
            .collect();

        if my_cocktails.is_empty() {
            tracing::debug!(user_id = %user_id, "No favorites to base recommendations on");
            return Ok(Vec::new());
        }

        let my_cocktail_ids: Vec<String> = my_cocktails.iter().cloned().collect();
        let similar_users: HashSet<Uuid> = self
            .store
            .list_by_cocktails(&my_cocktail_ids)
            .await?
            .into_iter()
            .map(|f| f.user_id)
            .filter(|other| *other != user_id)
            .collect();

        if similar_users.is_empty() {
            tracing::debug!(user_id = %user_id, "No similar users found");
            return Ok(Vec::new());
        }

        let similar_user_ids: Vec<Uuid> = similar_users.into_iter().collect();
        let candidates = self.store.list_by_users(&similar_user_ids).await?;

        let recommended = rank_by_count(
            candidates
                .iter()
                .map(|f| f.cocktail_id.as_str())
                .filter(|cocktail_id| !my_cocktails.contains(*cocktail_id)),
            limit,
        );

        tracing::info!(
            user_id = %user_id,
            favorites = my_cocktails.len(),
            similar_users = similar_user_ids.len(),
            returned = recommended.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Computed recommendations"
        );

        Ok(recommended)
    }
}

/// Any positive limit is honored; missing or non-positive falls back to the default
fn effective_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => DEFAULT_RECOMMENDATION_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryFavoriteStore, MockFavoriteStore};

    async fn favorite_all(store: &InMemoryFavoriteStore, user: Uuid, cocktails: &[&str]) {
        for cocktail in cocktails {
            store.add(user, cocktail).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_recommends_from_similar_users() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        favorite_all(&store, a, &["margarita"]).await;
        favorite_all(&store, b, &["margarita", "mojito"]).await;
        favorite_all(&store, c, &["mojito"]).await;

        let service = RecommendationService::new(store);
        let result = service.recommend(a, Some(10)).await.unwrap();

        assert_eq!(result, vec![CocktailCount::new("mojito", 1)]);
    }

    #[tokio::test]
    async fn test_user_without_favorites_gets_nothing() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        favorite_all(&store, Uuid::new_v4(), &["margarita", "mojito"]).await;

        let service = RecommendationService::new(store);
        let result = service.recommend(Uuid::new_v4(), Some(10)).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_no_similar_users_short_circuits() {
        let mut store = MockFavoriteStore::new();
        let user = Uuid::new_v4();
        store.expect_list_by_user().times(1).returning(move |u| {
            Ok(vec![crate::models::FavoriteCocktail::new(u, "margarita")])
        });
        store
            .expect_list_by_cocktails()
            .times(1)
            .returning(move |_| Ok(vec![crate::models::FavoriteCocktail::new(user, "margarita")]));
        store.expect_list_by_users().never();

        let service = RecommendationService::new(Arc::new(store));
        let result = service.recommend(user, None).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_never_recommends_own_favorites() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let me = Uuid::new_v4();
        favorite_all(&store, me, &["margarita", "negroni"]).await;
        favorite_all(&store, Uuid::new_v4(), &["margarita", "negroni", "spritz"]).await;
        favorite_all(&store, Uuid::new_v4(), &["negroni", "spritz", "bellini"]).await;
        favorite_all(&store, Uuid::new_v4(), &["old fashioned"]).await;

        let service = RecommendationService::new(store);
        let result = service.recommend(me, None).await.unwrap();

        assert_eq!(
            result,
            vec![
                CocktailCount::new("spritz", 2),
                CocktailCount::new("bellini", 1),
            ]
        );
        assert!(result
            .iter()
            .all(|r| r.cocktail_id != "margarita" && r.cocktail_id != "negroni"));
    }

    #[tokio::test]
    async fn test_limit_truncates_ranking() {
        let store = Arc::new(InMemoryFavoriteStore::new());
        let me = Uuid::new_v4();
        favorite_all(&store, me, &["margarita"]).await;
        favorite_all(&store, Uuid::new_v4(), &["margarita", "a", "b", "c"]).await;
        favorite_all(&store, Uuid::new_v4(), &["margarita", "c"]).await;

        let service = RecommendationService::new(store);
        let result = service.recommend(me, Some(2)).await.unwrap();

        assert_eq!(
            result,
            vec![CocktailCount::new("c", 2), CocktailCount::new("a", 1)]
        );
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), 10);
        assert_eq!(effective_limit(Some(0)), 10);
        assert_eq!(effective_limit(Some(-3)), 10);
        assert_eq!(effective_limit(Some(7)), 7);
        assert_eq!(effective_limit(Some(500)), 500);
    }
}
