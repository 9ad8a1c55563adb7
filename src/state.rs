use crate::config::AppConfig;
use crate::session::SessionStore;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub sessions: SessionStore,
  pub config: Arc<AppConfig>, // Share loaded config
}
