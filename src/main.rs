use std::sync::Arc;

use leaderboard_service::leaderboard::repository::InMemoryLeaderboardRepository;
use leaderboard_service::ranking::repository::InMemoryEntryRepository;
use leaderboard_service::{app, AppState};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaderboard_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting leaderboard service");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let leaderboard_repository = Arc::new(InMemoryLeaderboardRepository::new());
    let entry_repository = Arc::new(InMemoryEntryRepository::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let leaderboard_repository = Arc::new(PostgresLeaderboardRepository::new(pool.clone()));
    // let entry_repository = Arc::new(PostgresEntryRepository::new(pool));

    let app_state = AppState::new(leaderboard_repository, entry_repository);

    let router = app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, router).await.unwrap();
}
