//! Server-side sessions addressed by an opaque cookie.
//!
//! Each session is a row in the `sessions` table holding a JSON-encoded
//! claim and a unix-seconds expiry. Loads slide the expiry forward, which
//! gives the inactivity window its semantics; a background sweep removes
//! rows that lapsed without a logout.

use crate::errors::{AppError, Result};
use crate::models::account::Role;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// The claim persisted for an authenticated client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
  pub email: String,
  pub role: Role,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

#[derive(Clone)]
pub struct SessionStore {
  pool: SqlitePool,
  ttl_secs: i64,
}

impl SessionStore {
  pub fn new(pool: SqlitePool, ttl_secs: i64) -> Self {
    Self { pool, ttl_secs }
  }

  /// Creates a session row and returns the opaque id that goes into the
  /// cookie.
  pub async fn create(&self, user: &SessionUser) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let data = serde_json::to_string(user)
      .map_err(|e| AppError::Internal(format!("Failed to encode session claim: {}", e)))?;
    let expires_at = Utc::now().timestamp() + self.ttl_secs;

    sqlx::query("INSERT INTO sessions (id, data, expires_at) VALUES (?, ?, ?)")
      .bind(&id)
      .bind(&data)
      .bind(expires_at)
      .execute(&self.pool)
      .await?;

    Ok(id)
  }

  /// Loads a live session and slides its expiry window forward. Expired or
  /// unknown ids come back as `None`.
  pub async fn load(&self, id: &str) -> Result<Option<SessionUser>> {
    let now = Utc::now().timestamp();

    let row: Option<(String,)> =
      sqlx::query_as("SELECT data FROM sessions WHERE id = ? AND expires_at > ?")
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
    let Some((data,)) = row else {
      return Ok(None);
    };

    let user: SessionUser = serde_json::from_str(&data)
      .map_err(|e| AppError::Internal(format!("Failed to decode session claim: {}", e)))?;

    sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
      .bind(now + self.ttl_secs)
      .bind(id)
      .execute(&self.pool)
      .await?;

    Ok(Some(user))
  }

  /// Rewrites the claim in place; profile updates use this to refresh the
  /// display name without issuing a new cookie.
  pub async fn update_user(&self, id: &str, user: &SessionUser) -> Result<()> {
    let data = serde_json::to_string(user)
      .map_err(|e| AppError::Internal(format!("Failed to encode session claim: {}", e)))?;
    let expires_at = Utc::now().timestamp() + self.ttl_secs;

    sqlx::query("UPDATE sessions SET data = ?, expires_at = ? WHERE id = ?")
      .bind(&data)
      .bind(expires_at)
      .bind(id)
      .execute(&self.pool)
      .await?;

    Ok(())
  }

  pub async fn destroy(&self, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  /// Removes rows whose inactivity window lapsed without an explicit logout.
  /// Returns the number of rows swept.
  pub async fn delete_expired(&self) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
      .bind(Utc::now().timestamp())
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }
}

/// Builds the session cookie: opaque value, HttpOnly, SameSite=Lax. The
/// `secure` flag comes from configuration and must be on behind TLS.
pub fn session_cookie(name: &str, value: String, secure: bool) -> Cookie<'_> {
  Cookie::build(name, value)
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(secure)
    .finish()
}

/// An immediately-expiring copy of the session cookie, for logout responses.
pub fn clear_session_cookie(name: &str, secure: bool) -> Cookie<'_> {
  let mut cookie = session_cookie(name, String::new(), secure);
  cookie.set_max_age(CookieDuration::ZERO);
  cookie
}
