use novamart::config::AppConfig;
use novamart::db;
use novamart::session::SessionStore;
use novamart::state::AppState;
use novamart::web::routes::configure_app_routes;

use actix_web::{middleware::DefaultHeaders, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting NovaMart marketplace server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize Database Pool
  let db_pool = match db::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = db::init_schema(&db_pool).await {
    tracing::error!(error = %e, "Failed to initialise the database schema.");
    panic!("Schema error: {}", e);
  }

  if let Err(e) = std::fs::create_dir_all(&app_config.upload_dir) {
    tracing::error!(error = %e, dir = %app_config.upload_dir, "Failed to create the upload directory.");
    panic!("Upload directory error: {}", e);
  }

  let sessions = SessionStore::new(db_pool.clone(), app_config.session_ttl_secs);

  // Sweep lapsed sessions so logout is not the only path that removes rows.
  let sweep_store = sessions.clone();
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(Duration::from_secs(60));
    loop {
      ticker.tick().await;
      match sweep_store.delete_expired().await {
        Ok(0) => {}
        Ok(n) => tracing::debug!(purged = n, "Removed expired sessions"),
        Err(e) => tracing::warn!(error = %e, "Expired-session sweep failed"),
      }
    }
  });

  // Create AppState
  let app_state = AppState {
    db_pool,
    sessions,
    config: app_config.clone(),
  };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  let upload_dir = app_config.upload_dir.clone();
  HttpServer::new(move || {
    let upload_dir = upload_dir.clone();
    App::new()
      .app_data(actix_web::web::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      // Dashboards and session probes must never be served from cache.
      .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store, no-cache, must-revalidate, private")))
      .configure(move |cfg| configure_app_routes(cfg, &upload_dir))
  })
  .bind(&server_address)?
  .run()
  .await
}
