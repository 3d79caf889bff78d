use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Classify driver failures into the taxonomy callers branch on:
// connectivity vs constraint vs not-found vs query.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(classify(err))
    }
}

fn classify(err: sqlx::Error) -> DatabaseError {
    match err {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_) => DatabaseError::Connectivity(err.to_string()),
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => DatabaseError::ConstraintViolation(db_err.to_string()),
            _ => DatabaseError::QueryError(db_err.to_string()),
        },
        _ => DatabaseError::QueryError(err.to_string()),
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connectivity(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Record not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(
            app_err,
            AppError::DatabaseError(DatabaseError::NotFound)
        ));
    }

    #[test]
    fn test_pool_failures_map_to_connectivity() {
        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(
            app_err,
            AppError::DatabaseError(DatabaseError::Connectivity(_))
        ));

        let app_err: AppError = sqlx::Error::PoolClosed.into();
        assert!(matches!(
            app_err,
            AppError::DatabaseError(DatabaseError::Connectivity(_))
        ));
    }

    #[test]
    fn test_protocol_error_maps_to_query() {
        let app_err: AppError = sqlx::Error::Protocol("unexpected packet".into()).into();
        assert!(matches!(
            app_err,
            AppError::DatabaseError(DatabaseError::QueryError(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::DatabaseError(DatabaseError::NotFound);
        assert_eq!(err.to_string(), "Database error: Record not found");

        let err = AppError::DatabaseError(DatabaseError::Connectivity("refused".into()));
        assert_eq!(err.to_string(), "Database error: Connection error: refused");
    }
}
