use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::FavoriteStore,
    error::{AppError, AppResult},
    models::{rank_by_count, CocktailCount, FavoriteCocktail},
};

type FavoriteKey = (Uuid, String);

/// Process-local favorite store
///
/// Used by tests and local runs without Postgres. The map key is the
/// `(user_id, cocktail_id)` pair, and inserts hold the write lock across the
/// existence check so duplicates are rejected atomically.
#[derive(Default)]
pub struct InMemoryFavoriteStore {
    favorites: RwLock<HashMap<FavoriteKey, FavoriteCocktail>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a favorite with an explicit timestamp
    pub async fn insert_at(
        &self,
        user_id: Uuid,
        cocktail_id: &str,
        favorited_at: DateTime<Utc>,
    ) -> AppResult<FavoriteCocktail> {
        let mut favorites = self.favorites.write().await;
        let key = (user_id, cocktail_id.to_string());

        if favorites.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "Cocktail {} is already in favorites",
                cocktail_id
            )));
        }

        let favorite = FavoriteCocktail::favorited_at(user_id, cocktail_id, favorited_at);
        favorites.insert(key, favorite.clone());
        Ok(favorite)
    }

    /// Number of stored favorites across all users
    pub async fn len(&self) -> usize {
        self.favorites.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.favorites.read().await.is_empty()
    }

    async fn collect_where<F>(&self, predicate: F) -> Vec<FavoriteCocktail>
    where
        F: Fn(&FavoriteCocktail) -> bool,
    {
        self.favorites
            .read()
            .await
            .values()
            .filter(|f| predicate(f))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn add(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<FavoriteCocktail> {
        self.insert_at(user_id, cocktail_id, Utc::now()).await
    }

    async fn remove(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<()> {
        let mut favorites = self.favorites.write().await;

        match favorites.remove(&(user_id, cocktail_id.to_string())) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Cocktail {} is not in favorites",
                cocktail_id
            ))),
        }
    }

    async fn exists(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<bool> {
        let favorites = self.favorites.read().await;
        Ok(favorites.contains_key(&(user_id, cocktail_id.to_string())))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<FavoriteCocktail>> {
        let mut mine = self.collect_where(|f| f.user_id == user_id).await;
        mine.sort_by(|a, b| b.favorited_at.cmp(&a.favorited_at));
        Ok(mine)
    }

    async fn list_by_cocktail_since(
        &self,
        cocktail_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<FavoriteCocktail>> {
        Ok(self
            .collect_where(|f| f.cocktail_id == cocktail_id && f.favorited_at >= since)
            .await)
    }

    async fn list_all(&self) -> AppResult<Vec<FavoriteCocktail>> {
        Ok(self.collect_where(|_| true).await)
    }

    async fn list_by_users(&self, user_ids: &[Uuid]) -> AppResult<Vec<FavoriteCocktail>> {
        Ok(self.collect_where(|f| user_ids.contains(&f.user_id)).await)
    }

    async fn list_by_cocktails(
        &self,
        cocktail_ids: &[String],
    ) -> AppResult<Vec<FavoriteCocktail>> {
        Ok(self
            .collect_where(|f| cocktail_ids.contains(&f.cocktail_id))
            .await)
    }

    async fn top_cocktails(&self, limit: usize) -> AppResult<Vec<CocktailCount>> {
        let favorites = self.favorites.read().await;
        Ok(rank_by_count(
            favorites.keys().map(|(_, cocktail_id)| cocktail_id.as_str()),
            limit,
        ))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
