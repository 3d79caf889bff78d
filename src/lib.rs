pub mod config;
pub mod db;
pub mod error;

use sqlx::PgPool;
use std::sync::Arc;

pub use config::Settings;
pub use db::{NewUser, User, UserRepository, UserUpdate};
pub use error::{AppError, DatabaseError};

pub type Result<T> = std::result::Result<T, AppError>;

/// Application state owning the shared connection pool.
///
/// The pool is created once at startup and closed once at shutdown;
/// repositories borrow it rather than holding process-wide globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: Arc<PgPool>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db_pool = db::connect_pool(&config.database).await?;

        Ok(Self {
            config: Arc::new(config),
            db_pool: Arc::new(db_pool),
        })
    }

    pub fn repository(&self) -> UserRepository {
        UserRepository::new(self.db_pool.clone())
    }

    pub async fn shutdown(&self) -> Result<()> {
        // Close database connections
        self.db_pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn cleanup_env() {
        env::remove_var("APP_DATABASE__HOST");
        env::remove_var("APP_DATABASE__PORT");
    }

    #[tokio::test]
    async fn test_app_state_creation() {
        cleanup_env();
        let config = Settings::new_for_test().expect("Failed to load test config");

        // Without a reachable database this fails with a connectivity
        // error; with one it must shut down cleanly.
        match AppState::new(config).await {
            Ok(state) => state.shutdown().await.expect("Failed to shut down"),
            Err(e) => assert!(matches!(e, AppError::DatabaseError(_))),
        }
    }

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
