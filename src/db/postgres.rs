use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    config::Config,
    db::FavoriteStore,
    error::{AppError, AppResult},
    models::{CocktailCount, FavoriteCocktail},
};

/// Creates a PostgreSQL connection pool
///
/// Every pooled connection carries a `statement_timeout`, and waiting for a
/// free connection is bounded by the acquire timeout, so no storage call can
/// block indefinitely.
pub async fn create_pool(config: &Config) -> anyhow::Result<PgPool> {
    let statement_timeout = format!("{}ms", config.db_statement_timeout_ms);
    let connect_options: PgConnectOptions = config.database_url.parse()?;
    let connect_options =
        connect_options.options([("statement_timeout", statement_timeout.as_str())]);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_lazy_with(connect_options);

    Ok(pool)
}

/// Applies embedded migrations, retrying while the database comes up
///
/// Makes up to `migration_max_attempts` attempts with a fixed delay in between
/// and returns the last error once they are exhausted.
pub async fn run_migrations(pool: &PgPool, config: &Config) -> anyhow::Result<()> {
    let max_attempts = config.migration_max_attempts.max(1);
    let delay = Duration::from_secs(config.migration_retry_delay_secs);

    for attempt in 1..=max_attempts {
        match sqlx::migrate!("./migrations").run(pool).await {
            Ok(()) => {
                tracing::info!(attempt, "Database migrations applied");
                return Ok(());
            }
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    error = %e,
                    attempt,
                    max_attempts,
                    retry_in_secs = delay.as_secs(),
                    "Database not ready, retrying migrations"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Migrations failed after {} attempts: {}",
                    max_attempts,
                    e
                ));
            }
        }
    }

    Ok(())
}

/// Postgres-backed favorite store
///
/// Uniqueness of `(user_id, cocktail_id)` is enforced by a table constraint;
/// a duplicate insert is reported as `AppError::Conflict`.
#[derive(Clone)]
pub struct PgFavoriteStore {
    pool: PgPool,
}

impl PgFavoriteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FAVORITE_COLUMNS: &str = "id, user_id, cocktail_id, favorited_at";

fn conflict(cocktail_id: &str) -> AppError {
    AppError::Conflict(format!("Cocktail {} is already in favorites", cocktail_id))
}

#[async_trait::async_trait]
impl FavoriteStore for PgFavoriteStore {
    #[instrument(name = "db.favorite.add", skip(self))]
    async fn add(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<FavoriteCocktail> {
        let favorite = FavoriteCocktail::new(user_id, cocktail_id);

        let inserted = sqlx::query_as::<_, FavoriteCocktail>(&format!(
            r#"
            INSERT INTO favorite_cocktails ({FAVORITE_COLUMNS})
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, cocktail_id) DO NOTHING
            RETURNING {FAVORITE_COLUMNS}
            "#
        ))
        .bind(favorite.id)
        .bind(favorite.user_id)
        .bind(&favorite.cocktail_id)
        .bind(favorite.favorited_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                conflict(cocktail_id)
            }
            other => AppError::from(other),
        })?;

        inserted.ok_or_else(|| conflict(cocktail_id))
    }

    #[instrument(name = "db.favorite.remove", skip(self))]
    async fn remove(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM favorite_cocktails WHERE user_id = $1 AND cocktail_id = $2")
                .bind(user_id)
                .bind(cocktail_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Cocktail {} is not in favorites",
                cocktail_id
            )));
        }

        Ok(())
    }

    #[instrument(name = "db.favorite.exists", skip(self))]
    async fn exists(&self, user_id: Uuid, cocktail_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM favorite_cocktails WHERE user_id = $1 AND cocktail_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(cocktail_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[instrument(name = "db.favorite.list_by_user", skip(self))]
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<FavoriteCocktail>> {
        let favorites = sqlx::query_as::<_, FavoriteCocktail>(&format!(
            r#"
            SELECT {FAVORITE_COLUMNS}
            FROM favorite_cocktails
            WHERE user_id = $1
            ORDER BY favorited_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    #[instrument(name = "db.favorite.list_by_cocktail_since", skip(self))]
    async fn list_by_cocktail_since(
        &self,
        cocktail_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<FavoriteCocktail>> {
        let favorites = sqlx::query_as::<_, FavoriteCocktail>(&format!(
            r#"
            SELECT {FAVORITE_COLUMNS}
            FROM favorite_cocktails
            WHERE cocktail_id = $1 AND favorited_at >= $2
            "#
        ))
        .bind(cocktail_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    #[instrument(name = "db.favorite.list_all", skip(self))]
    async fn list_all(&self) -> AppResult<Vec<FavoriteCocktail>> {
        let favorites = sqlx::query_as::<_, FavoriteCocktail>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorite_cocktails"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    #[instrument(name = "db.favorite.list_by_users", skip(self, user_ids), fields(users = user_ids.len()))]
    async fn list_by_users(&self, user_ids: &[Uuid]) -> AppResult<Vec<FavoriteCocktail>> {
        let favorites = sqlx::query_as::<_, FavoriteCocktail>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorite_cocktails WHERE user_id = ANY($1)"
        ))
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    #[instrument(name = "db.favorite.list_by_cocktails", skip(self, cocktail_ids), fields(cocktails = cocktail_ids.len()))]
    async fn list_by_cocktails(
        &self,
        cocktail_ids: &[String],
    ) -> AppResult<Vec<FavoriteCocktail>> {
        let favorites = sqlx::query_as::<_, FavoriteCocktail>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorite_cocktails WHERE cocktail_id = ANY($1)"
        ))
        .bind(cocktail_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    #[instrument(name = "db.favorite.top_cocktails", skip(self))]
    async fn top_cocktails(&self, limit: usize) -> AppResult<Vec<CocktailCount>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT cocktail_id, COUNT(*) AS favorites
            FROM favorite_cocktails
            GROUP BY cocktail_id
            ORDER BY favorites DESC, cocktail_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(cocktail_id, count)| CocktailCount::new(cocktail_id, count.max(0) as u64))
            .collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
