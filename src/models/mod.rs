use serde::Deserialize;

mod analytics;
mod favorite;

pub use analytics::{
    rank_by_count, CocktailCount, TrendInterval, TrendPoint, ALLOWED_TOP, DEFAULT_RECOMMENDATION_LIMIT,
    DEFAULT_TOP,
};
pub use favorite::{FavoriteCocktail, FavoriteCocktailDto};

/// Body of an add-favorite request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCocktailRequest {
    pub cocktail_id: String,
}
