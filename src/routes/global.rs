use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{AdminIdentity, CallerIdentity},
    models::{CocktailCount, TrendInterval, TrendPoint},
    routes::AppState,
    services::popularity::parse_top,
};

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    top: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    interval: Option<String>,
}

/// Handler for the global popularity ranking
pub async fn popular(
    State(state): State<Arc<AppState>>,
    _caller: CallerIdentity,
    Query(params): Query<PopularQuery>,
) -> AppResult<Json<Vec<CocktailCount>>> {
    let top = parse_top(params.top.as_deref())?;
    let ranking = state.popularity.top_cocktails(top).await?;
    Ok(Json(ranking))
}

/// Handler for a cocktail's favorite trend, restricted to admins
pub async fn trend(
    State(state): State<Arc<AppState>>,
    AdminIdentity(admin): AdminIdentity,
    Path(cocktail_id): Path<String>,
    Query(params): Query<TrendQuery>,
) -> AppResult<Json<Vec<TrendPoint>>> {
    let interval = TrendInterval::parse_lenient(params.interval.as_deref());

    tracing::info!(
        admin_id = %admin.user_id,
        cocktail_id = %cocktail_id,
        interval = %interval,
        "Fetching cocktail trend"
    );

    let trend = state.trend.trend(&cocktail_id, interval).await?;
    Ok(Json(trend))
}
