//! Database module for the user store
//!
//! Handles connection pool setup and the data access layer
//! for the `users` table.

pub mod models;
pub mod operations;

pub use models::{NewUser, User, UserUpdate};
pub use operations::{PoolStatus, UserRepository};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Build the connection pool from configuration.
///
/// Every knob is fixed at construction; the pool is shared by all
/// repository calls and closed once at shutdown. A connection that
/// cannot be established within the acquire timeout surfaces as a
/// `DatabaseError::Connectivity`.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .acquire_timeout(config.pool.acquire_timeout())
        .idle_timeout(config.pool.idle_timeout())
        .max_lifetime(config.pool.max_lifetime())
        .connect(&config.connect_url())
        .await?;

    Ok(pool)
}
