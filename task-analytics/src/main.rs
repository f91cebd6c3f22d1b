// task-analytics/src/main.rs
use migration::{Migrator, MigratorTrait};
use task_analytics::api::{create_router, AppState};
use task_analytics::config::AppConfig;
use task_analytics::db::create_db_pool;
use task_analytics::logging::init_tracing;
use task_analytics::middleware::auth::cors_layer;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    init_tracing("task_analytics=info,tower_http=info");

    tracing::info!("Starting Task Analytics server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        addr = %app_config.server_addr(),
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    if app_config.run_migrations {
        Migrator::up(db_pool.as_ref(), None).await?;
        tracing::info!("Database migrations applied.");
    }

    let server_addr = app_config.server_addr();
    let cors = cors_layer(&app_config);
    let request_timeout = app_config.request_timeout;

    let app_state = AppState::new(app_config, db_pool)?;

    // ルーターの設定
    let app_router = create_router(app_state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
