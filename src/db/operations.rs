use std::sync::Arc;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::db::models::{NewUser, User, UserUpdate};
use crate::error::AppError;

const SELECT_USER: &str =
    "SELECT id, username, email, full_name, created_at, updated_at FROM users";

/// Data access layer for the `users` table.
///
/// The pool is injected at construction and shared across all
/// operations; each call holds one connection for the duration of a
/// single statement and returns it to the pool on every exit path.
#[derive(Clone)]
pub struct UserRepository {
    pool: Arc<PgPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Build a pool from configuration and wrap it in a repository.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = crate::db::connect_pool(config).await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub fn pool_status(&self) -> PoolStatus {
        let total = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        PoolStatus {
            total_connections: total,
            active_connections: total - idle,
            idle_connections: idle,
        }
    }

    /// Close the pool; any further operation fails with a connectivity error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert one user and return the server-assigned id.
    ///
    /// A duplicate username surfaces as `DatabaseError::ConstraintViolation`
    /// when the table carries a unique constraint.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email, full_name) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .fetch_one(self.pool.as_ref())
        .await?;

        info!("Created user {} (id: {})", new_user.username, id);
        Ok(id)
    }

    /// Fetch one user by id. `Ok(None)` means no row matched; driver
    /// failures propagate as errors, so the two are distinguishable.
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if user.is_none() {
            warn!("User with id {} not found", id);
        }
        Ok(user)
    }

    /// All users, newest first. The id tiebreak keeps insertion order
    /// stable when rows share a creation timestamp.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_USER
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        info!("Retrieved {} users", users.len());
        Ok(users)
    }

    /// Update the supplied fields of one user. Returns whether a row was
    /// affected; an empty update performs no database call and reports
    /// `false`. `updated_at` is refreshed in the statement itself rather
    /// than relying on a database trigger.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<bool, AppError> {
        if update.is_empty() {
            warn!("No fields to update for user {}", id);
            return Ok(false);
        }

        let mut statement = update_statement(id, update);
        let result = statement.build().execute(self.pool.as_ref()).await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Updated user id {}", id);
        } else {
            warn!("User with id {} not found", id);
        }
        Ok(updated)
    }

    /// Delete one user. Returns whether a row was affected; a missing id
    /// reports `false`, not an error.
    pub async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted user id {}", id);
        } else {
            warn!("User with id {} not found", id);
        }
        Ok(deleted)
    }
}

/// Dynamic `UPDATE` over the supplied fields only, fully parameterized.
fn update_statement<'a>(id: i64, update: &'a UserUpdate) -> QueryBuilder<'a, Postgres> {
    let mut builder: QueryBuilder<'a, Postgres> = QueryBuilder::new("UPDATE users SET ");

    {
        let mut sets = builder.separated(", ");
        if let Some(email) = &update.email {
            sets.push("email = ").push_bind_unseparated(email.as_str());
        }
        if let Some(full_name) = &update.full_name {
            sets.push("full_name = ")
                .push_bind_unseparated(full_name.as_str());
        }
        sets.push("updated_at = now()");
    }

    builder.push(" WHERE id = ").push_bind(id);
    builder
}

#[derive(Debug, Clone)]
pub struct PoolStatus {
    pub total_connections: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_statement_email_only() {
        let update = UserUpdate::email("new@example.com");
        let statement = update_statement(42, &update);
        assert_eq!(
            statement.sql(),
            "UPDATE users SET email = $1, updated_at = now() WHERE id = $2"
        );
    }

    #[test]
    fn test_update_statement_full_name_only() {
        let update = UserUpdate::full_name("Grace Hopper");
        let statement = update_statement(42, &update);
        assert_eq!(
            statement.sql(),
            "UPDATE users SET full_name = $1, updated_at = now() WHERE id = $2"
        );
    }

    #[test]
    fn test_update_statement_both_fields() {
        let update = UserUpdate {
            email: Some("new@example.com".to_string()),
            full_name: Some("Grace Hopper".to_string()),
        };
        let statement = update_statement(42, &update);
        assert_eq!(
            statement.sql(),
            "UPDATE users SET email = $1, full_name = $2, updated_at = now() WHERE id = $3"
        );
    }
}
