use std::fmt::Display;
use std::sync::Arc;

use crate::{
    db::FavoriteStore,
    error::{AppError, AppResult},
    models::{CocktailCount, ALLOWED_TOP, DEFAULT_TOP},
};

/// Global ranking of cocktails by number of favorites
#[derive(Clone)]
pub struct PopularityService {
    store: Arc<dyn FavoriteStore>,
}

impl PopularityService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Returns the `top` most favorited cocktails
    ///
    /// `top` must be one of [`ALLOWED_TOP`]; anything else is rejected before
    /// the store is read. Counting and ordering happen in the store.
    pub async fn top_cocktails(&self, top: i32) -> AppResult<Vec<CocktailCount>> {
        let take = validate_top(top)?;

        let ranked = self.store.top_cocktails(take).await?;

        tracing::info!(
            top,
            store = self.store.name(),
            returned = ranked.len(),
            "Computed popular cocktails"
        );

        Ok(ranked)
    }
}

/// Parses the raw `top` query value, defaulting to [`DEFAULT_TOP`] when absent
///
/// A value that is not an integer gets the same error as a disallowed one.
pub fn parse_top(raw: Option<&str>) -> AppResult<i32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_TOP),
        Some(value) => value.parse::<i32>().map_err(|_| invalid_top(value)),
    }
}

fn validate_top(top: i32) -> AppResult<usize> {
    if !ALLOWED_TOP.contains(&top) {
        return Err(invalid_top(top));
    }
    Ok(top as usize)
}

fn invalid_top(value: impl Display) -> AppError {
    let allowed: Vec<String> = ALLOWED_TOP.iter().map(|n| n.to_string()).collect();
    AppError::InvalidInput(format!(
        "Invalid 'top' value {}. Allowed values: {}",
        value,
        allowed.join(", ")
    ))
}
