use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tugaskita::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tugaskita=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if let Err(e) = seed::ensure_admin(&db, &config).await {
        tracing::error!("Failed to create bootstrap admin: {}", e);
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        tracing::error!("Failed to create upload dir {}: {}", config.upload_dir, e);
    }

    server::serve(db, &config)
        .await
        .expect("Failed to start server");
}
