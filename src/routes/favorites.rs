use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{CallerIdentity, RequestId},
    models::{CocktailCount, FavoriteCocktail, FavoriteCocktailDto, FavoriteCocktailRequest},
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsFavoriteResponse {
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    limit: Option<i64>,
}

/// Handler for adding a favorite
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Json(request): Json<FavoriteCocktailRequest>,
) -> AppResult<(StatusCode, Json<FavoriteCocktail>)> {
    tracing::info!(
        request_id = %request_id,
        user_id = %caller.user_id,
        cocktail_id = %request.cocktail_id,
        "Adding favorite"
    );

    let favorite = state
        .favorites
        .add(caller.user_id, &request.cocktail_id)
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Handler for the caller's favorites, newest first
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> AppResult<Json<Vec<FavoriteCocktailDto>>> {
    let favorites = state.favorites.list_mine(caller.user_id).await?;
    Ok(Json(favorites))
}

pub async fn is_favorite(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(cocktail_id): Path<String>,
) -> AppResult<Json<IsFavoriteResponse>> {
    let is_favorite = state
        .favorites
        .is_favorite(caller.user_id, &cocktail_id)
        .await?;
    Ok(Json(IsFavoriteResponse { is_favorite }))
}

/// Handler for removing a favorite
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path(cocktail_id): Path<String>,
) -> AppResult<StatusCode> {
    remove_favorite(&state, request_id, &caller, &cocktail_id).await
}

/// `DELETE /mine` is routed alongside the static listing, not to `/:cocktail_id`
pub async fn remove_mine(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
) -> AppResult<StatusCode> {
    remove_favorite(&state, request_id, &caller, "mine").await
}

/// Same as [`remove_mine`] for a cocktail whose id is `recommended`
pub async fn remove_recommended(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
) -> AppResult<StatusCode> {
    remove_favorite(&state, request_id, &caller, "recommended").await
}

async fn remove_favorite(
    state: &AppState,
    request_id: RequestId,
    caller: &CallerIdentity,
    cocktail_id: &str,
) -> AppResult<StatusCode> {
    tracing::info!(
        request_id = %request_id,
        user_id = %caller.user_id,
        cocktail_id = %cocktail_id,
        "Removing favorite"
    );

    state.favorites.remove(caller.user_id, cocktail_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for the caller's recommendations
pub async fn recommended(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<CocktailCount>>> {
    let recommendations = state
        .recommendations
        .recommend(caller.user_id, params.limit)
        .await?;
    Ok(Json(recommendations))
}
