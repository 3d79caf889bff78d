use dotenv::dotenv;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use userdb_service::{AppState, NewUser, Settings, UserUpdate};

/// Demo driver exercising the full CRUD sequence against the shared
/// pool: create, read, list, update, delete, verify. Not part of the
/// reusable core.
#[tokio::main]
async fn main() -> userdb_service::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    // Initialize application state (creates the connection pool)
    let state = AppState::new(config).await?;
    let repo = state.repository();

    let status = repo.pool_status();
    info!(
        "Connection pool ready ({} total, {} idle)",
        status.total_connections, status.idle_connections
    );

    // CREATE
    let new_user = NewUser::new("demo_user", "demo.user@example.com", "Demo User");
    let id = repo.create_user(&new_user).await?;

    // READ
    if let Some(user) = repo.get_user_by_id(id).await? {
        info!("User details: {}", serde_json::to_string_pretty(&user)?);
    }

    // LIST
    let users = repo.list_users().await?;
    for user in &users {
        info!("  - {}: {}", user.username, user.email);
    }

    // UPDATE
    let update = UserUpdate {
        email: Some("updated.user@example.com".to_string()),
        full_name: Some("Updated Demo User".to_string()),
    };
    if repo.update_user(id, &update).await? {
        if let Some(user) = repo.get_user_by_id(id).await? {
            info!("Updated user: {}", serde_json::to_string_pretty(&user)?);
        }
    }

    // DELETE
    if repo.delete_user(id).await? {
        match repo.get_user_by_id(id).await? {
            None => info!("User successfully deleted"),
            Some(_) => warn!("User id {} still present after delete", id),
        }
    }

    state.shutdown().await?;
    info!("Connection pool closed");

    Ok(())
}
