use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single user's mark of a cocktail as favorite
///
/// At most one exists per `(user_id, cocktail_id)`; the record is created
/// and deleted but never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCocktail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cocktail_id: String,
    pub favorited_at: DateTime<Utc>,
}

impl FavoriteCocktail {
    /// Creates a new favorite stamped with the current time
    pub fn new(user_id: Uuid, cocktail_id: impl Into<String>) -> Self {
        Self::favorited_at(user_id, cocktail_id, Utc::now())
    }

    /// Creates a new favorite with an explicit timestamp
    pub fn favorited_at(
        user_id: Uuid,
        cocktail_id: impl Into<String>,
        favorited_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            cocktail_id: cocktail_id.into(),
            favorited_at,
        }
    }
}

/// The caller's own view of a favorite
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCocktailDto {
    pub cocktail_id: String,
    pub favorited_at: DateTime<Utc>,
}

impl From<FavoriteCocktail> for FavoriteCocktailDto {
    fn from(favorite: FavoriteCocktail) -> Self {
        Self {
            cocktail_id: favorite.cocktail_id,
            favorited_at: favorite.favorited_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_favorite_gets_fresh_id() {
        let user = Uuid::new_v4();
        let a = FavoriteCocktail::new(user, "margarita");
        let b = FavoriteCocktail::new(user, "margarita");

        assert_ne!(a.id, b.id);
        assert_eq!(a.cocktail_id, "margarita");
        assert_eq!(a.user_id, user);
    }

    #[test]
    fn test_dto_serializes_camel_case() {
        let favorite = FavoriteCocktail::new(Uuid::new_v4(), "mojito");
        let dto = FavoriteCocktailDto::from(favorite);
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["cocktailId"], "mojito");
        assert!(json.get("favoritedAt").is_some());
    }
}
