use convertdocs::config::AppConfig;
use convertdocs::infrastructure::database;
use convertdocs::services::lifecycle::LifecycleTracker;
use convertdocs::services::reaper::Reaper;
use convertdocs::services::storage::UploadStore;
use convertdocs::{AppState, create_app};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convertdocs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting ConvertDocs API...");

    let config = AppConfig::from_env();
    info!(
        "🗑️  Lifecycle: delete {}s after response, reap files older than {}s every {}s",
        config.cleanup_delay_secs, config.retention_secs, config.reaper_interval_secs
    );

    let db = database::setup_database().await?;
    let store = UploadStore::new(&config.upload_dir).await?;
    info!("📁 Upload directory: {}", store.root().display());

    let tracker = LifecycleTracker::new(config.cleanup_delay());

    let state = AppState {
        db,
        store: store.clone(),
        tracker,
        config: config.clone(),
    };

    // Setup Shutdown Channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Start Background Reaper
    let reaper = Reaper::new(
        store.root(),
        config.retention(),
        config.reaper_interval(),
        shutdown_rx,
    );
    tokio::spawn(reaper.run());

    let app = create_app(state)
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(config.max_file_size));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
