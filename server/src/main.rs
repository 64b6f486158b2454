// server/src/main.rs

use minivan_taxi::config::{AppConfig, LogFormat, StoreBackend};
use minivan_taxi::store::{MemoryStore, PgStore, TaxiStore};
use minivan_taxi::{db, web, AppState};

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  // RUST_LOG overrides the default level
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  // Configuration decides the log format, so it is read before tracing exists.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  init_tracing(app_config.log_format);
  tracing::info!(
    backend = ?app_config.store_backend,
    port = app_config.server_port,
    "Application configuration loaded successfully."
  );
  tracing::info!("Starting minivan taxi server...");

  let (store, pool): (Arc<dyn TaxiStore>, Option<sqlx::PgPool>) = match (app_config.store_backend, app_config.database.as_ref()) {
    (StoreBackend::Postgres, Some(db_config)) => {
      let pool = db::connect_with_retry(db_config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to the database.");
        io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
      })?;
      let store: Arc<dyn TaxiStore> = Arc::new(PgStore::new(pool.clone()));
      (store, Some(pool))
    }
    (StoreBackend::Postgres, None) => {
      return Err(io::Error::new(io::ErrorKind::InvalidInput, "postgres backend without DATABASE_URL"));
    }
    (StoreBackend::Memory, _) => {
      tracing::warn!("Using the in-memory store seeded with the demo fleet; data is lost on shutdown.");
      let store: Arc<dyn TaxiStore> = Arc::new(MemoryStore::with_demo_fleet());
      (store, None)
    }
  };

  let app_state = AppState::new(store, &app_config);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let result = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await;

  if let Some(pool) = pool {
    pool.close().await;
    tracing::info!("Database pool closed.");
  }
  result
}
