use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  /// Directory uploaded product images are written to and served from.
  pub upload_dir: String,
  pub session_cookie_name: String,
  /// Must be enabled when the server sits behind TLS; the default only suits
  /// local HTTP development.
  pub session_cookie_secure: bool,
  /// Inactivity window before a session lapses.
  pub session_ttl_secs: i64,
  /// Where unauthenticated browser navigations are redirected to.
  pub login_page: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| "sqlite:novamart.db?mode=rwc".to_string());
    let upload_dir = get_env("UPLOAD_DIR").unwrap_or_else(|_| "images".to_string());

    let session_cookie_name = get_env("SESSION_COOKIE_NAME").unwrap_or_else(|_| "novamart_sid".to_string());
    let session_cookie_secure = get_env("SESSION_COOKIE_SECURE")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_COOKIE_SECURE value: {}", e)))?;
    let session_ttl_secs = get_env("SESSION_TTL_SECS")
      .unwrap_or_else(|_| "600".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_SECS: {}", e)))?;
    let login_page = get_env("LOGIN_PAGE").unwrap_or_else(|_| "/login".to_string());

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      upload_dir,
      session_cookie_name,
      session_cookie_secure,
      session_ttl_secs,
      login_page,
    })
  }
}
