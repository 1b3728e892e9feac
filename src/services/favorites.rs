use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::FavoriteStore,
    error::{AppError, AppResult},
    models::{FavoriteCocktail, FavoriteCocktailDto},
};

use super::normalize_cocktail_id;

/// Add, remove and look up a single user's favorites
#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn FavoriteStore>,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Marks a cocktail as favorite for the user
    ///
    /// Fails with `AppError::Conflict` if it already is one.
    pub async fn add(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<FavoriteCocktail> {
        let cocktail_id = normalize_cocktail_id(cocktail_id)?;

        match self.store.add(user_id, cocktail_id).await {
            Ok(favorite) => {
                tracing::info!(
                    user_id = %user_id,
                    cocktail_id = %cocktail_id,
                    favorite_id = %favorite.id,
                    "Favorite added"
                );
                Ok(favorite)
            }
            Err(AppError::Conflict(msg)) => {
                tracing::debug!(user_id = %user_id, cocktail_id = %cocktail_id, "Duplicate favorite");
                Err(AppError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// Removes a cocktail from the user's favorites
    pub async fn remove(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<()> {
        let cocktail_id = normalize_cocktail_id(cocktail_id)?;
        self.store.remove(user_id, cocktail_id).await?;

        tracing::info!(user_id = %user_id, cocktail_id = %cocktail_id, "Favorite removed");
        Ok(())
    }

    pub async fn is_favorite(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<bool> {
        let cocktail_id = normalize_cocktail_id(cocktail_id)?;
        self.store.exists(user_id, cocktail_id).await
    }

    /// The user's favorites, newest first
    pub async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<FavoriteCocktailDto>> {
        let favorites = self.store.list_by_user(user_id).await?;
        tracing::debug!(user_id = %user_id, count = favorites.len(), "Listed favorites");

        Ok(favorites.into_iter().map(FavoriteCocktailDto::from).collect())
    }
}
