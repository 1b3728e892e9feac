use crate::error::{AppError, AppResult};

pub mod favorites;
pub mod popularity;
pub mod recommendations;
pub mod trend;

pub use favorites::FavoriteService;
pub use popularity::PopularityService;
pub use recommendations::RecommendationService;
pub use trend::TrendService;

/// Trims a caller-supplied cocktail id, rejecting blank ones
pub(crate) fn normalize_cocktail_id(raw: &str) -> AppResult<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Cocktail id must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
