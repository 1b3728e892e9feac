use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CocktailCount, FavoriteCocktail},
};

/// Durable set of favorite events
///
/// Implementations own every record; the analytics services only read through
/// this trait. The store itself enforces that at most one favorite exists per
/// `(user_id, cocktail_id)`, so concurrent duplicate adds cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Records a new favorite stamped with the current time
    ///
    /// Fails with `AppError::Conflict` if the pair is already favorited.
    async fn add(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<FavoriteCocktail>;

    /// Deletes the pair's favorite, failing with `AppError::NotFound` if absent
    async fn remove(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<()>;

    async fn exists(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<bool>;

    /// A user's favorites, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<FavoriteCocktail>>;

    /// One cocktail's favorites with `favorited_at >= since`
    async fn list_by_cocktail_since(
        &self,
        cocktail_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<FavoriteCocktail>>;

    async fn list_all(&self) -> AppResult<Vec<FavoriteCocktail>>;

    async fn list_by_users(&self, user_ids: &[Uuid]) -> AppResult<Vec<FavoriteCocktail>>;

    async fn list_by_cocktails(&self, cocktail_ids: &[String])
        -> AppResult<Vec<FavoriteCocktail>>;

    /// The `limit` most favorited cocktails, most favorited first
    ///
    /// Equal counts are ordered by ascending cocktail id.
    async fn top_cocktails(&self, limit: usize) -> AppResult<Vec<CocktailCount>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
