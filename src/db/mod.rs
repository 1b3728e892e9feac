pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryFavoriteStore;
pub use postgres::{create_pool, run_migrations, PgFavoriteStore};
pub use store::FavoriteStore;

#[cfg(test)]
pub use store::MockFavoriteStore;
