use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::account::{AccountRow, Role};
use crate::services::{auth_service, identity};
use crate::session::{self, SessionUser};
use crate::state::AppState;
use crate::web::guards::{AdminAuth, BuyerAuth, MaybeSession, SellerAuth};

// --- Request DTOs ---

/// Registration payload for the roles that carry hostel details.
#[derive(Deserialize, Debug)]
pub struct RegisterDetailsPayload {
  pub name: String,
  pub email: String,
  pub smartcard_id: String,
  pub hostel: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct RegisterAdminPayload {
  pub name: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

// --- Shared pieces ---

/// Creates the session row and answers with the cookie plus the role's
/// redirect hint.
async fn logged_in_response(
  state: &AppState,
  user: SessionUser,
  message: String,
) -> Result<HttpResponse, AppError> {
  let redirect = user.role.dashboard_path();
  let session_id = state.sessions.create(&user).await?;
  let cookie = session::session_cookie(
    &state.config.session_cookie_name,
    session_id,
    state.config.session_cookie_secure,
  );

  Ok(
    HttpResponse::Ok()
      .cookie(cookie)
      .json(json!({ "message": message, "redirect": redirect })),
  )
}

/// Allocates the role id and inserts the account row in one transaction.
async fn insert_account_with_details(
  state: &AppState,
  role: Role,
  payload: &RegisterDetailsPayload,
) -> Result<String, AppError> {
  let hashed = auth_service::hash_password(&payload.password)?;

  let mut tx = state.db_pool.begin().await?;
  let role_id = identity::next_role_id(&mut tx, role).await?;
  let sql = format!(
    "INSERT INTO {} ({}, name, email, smartcard_id, hostel, hashed_password) VALUES (?, ?, ?, ?, ?, ?)",
    role.table(),
    role.id_column()
  );
  sqlx::query(&sql)
    .bind(&role_id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.smartcard_id)
    .bind(&payload.hostel)
    .bind(&hashed)
    .execute(&mut *tx)
    .await?;
  tx.commit().await?;

  info!(role = role.as_str(), %role_id, "Account created");
  Ok(role_id)
}

async fn find_account(pool: &SqlitePool, role: Role, email: &str) -> Result<Option<AccountRow>, AppError> {
  let sql = format!(
    "SELECT {} AS role_id, name, email, hashed_password FROM {} WHERE email = ?",
    role.id_column(),
    role.table()
  );
  Ok(sqlx::query_as(&sql).bind(email).fetch_optional(pool).await?)
}

// --- Handler Implementations ---

#[instrument(name = "handler::register_seller", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn register_seller_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterDetailsPayload>,
) -> Result<HttpResponse, AppError> {
  let role_id = insert_account_with_details(&app_state, Role::Seller, &payload).await?;
  let user = SessionUser {
    email: payload.email.clone(),
    role: Role::Seller,
    role_id: Some(role_id),
    name: Some(payload.name.clone()),
  };
  logged_in_response(&app_state, user, "Seller registered successfully".to_string()).await
}

#[instrument(name = "handler::register_buyer", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn register_buyer_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterDetailsPayload>,
) -> Result<HttpResponse, AppError> {
  let role_id = insert_account_with_details(&app_state, Role::Buyer, &payload).await?;
  let user = SessionUser {
    email: payload.email.clone(),
    role: Role::Buyer,
    role_id: Some(role_id),
    name: Some(payload.name.clone()),
  };
  logged_in_response(&app_state, user, "Buyer registered successfully".to_string()).await
}

#[instrument(name = "handler::register_admin", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn register_admin_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterAdminPayload>,
) -> Result<HttpResponse, AppError> {
  let hashed = auth_service::hash_password(&payload.password)?;

  let mut tx = app_state.db_pool.begin().await?;
  let role_id = identity::next_role_id(&mut tx, Role::Admin).await?;
  sqlx::query("INSERT INTO admindetails (admin_id, name, email, hashed_password) VALUES (?, ?, ?, ?)")
    .bind(&role_id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&hashed)
    .execute(&mut *tx)
    .await?;
  tx.commit().await?;

  info!(role = "admin", %role_id, "Account created");
  let user = SessionUser {
    email: payload.email.clone(),
    role: Role::Admin,
    role_id: Some(role_id),
    name: Some(payload.name.clone()),
  };
  logged_in_response(&app_state, user, "Admin registered successfully".to_string()).await
}

#[instrument(name = "handler::login", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  for role in Role::LOGIN_PROBE_ORDER {
    let Some(account) = find_account(&app_state.db_pool, role, &payload.email).await? else {
      continue;
    };

    // The first table holding this email decides the outcome; later tables
    // are not probed on a password mismatch.
    if !auth_service::verify_password(&account.hashed_password, &payload.password)? {
      warn!(role = role.as_str(), "Login rejected: password mismatch");
      return Err(AppError::Auth("Invalid email or password".to_string()));
    }

    info!(role = role.as_str(), role_id = %account.role_id, "Login successful");
    let user = SessionUser {
      email: account.email,
      role,
      role_id: Some(account.role_id),
      name: Some(account.name),
    };
    return logged_in_response(&app_state, user, format!("{} login successful", role.title())).await;
  }

  // Unknown emails get the same body as a wrong password.
  warn!("Login rejected: email not found in any role table");
  Err(AppError::Auth("Invalid email or password".to_string()))
}

#[instrument(name = "handler::logout", skip_all)]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  session: MaybeSession,
) -> Result<HttpResponse, AppError> {
  if let Some(auth) = session.0 {
    app_state.sessions.destroy(&auth.session_id).await?;
  }
  let cookie = session::clear_session_cookie(
    &app_state.config.session_cookie_name,
    app_state.config.session_cookie_secure,
  );
  Ok(HttpResponse::Ok().cookie(cookie).json(json!({"message": "Logged out"})))
}

#[instrument(name = "handler::check_session", skip_all)]
pub async fn check_session_handler(session: MaybeSession) -> Result<HttpResponse, AppError> {
  match session.0 {
    Some(auth) => Ok(HttpResponse::Ok().json(json!({"loggedIn": true, "user": auth.user}))),
    None => Ok(HttpResponse::Ok().json(json!({"loggedIn": false}))),
  }
}

// Guarded landing routes; these are the targets of the post-login redirect
// hints and exercise one guard each.

pub async fn seller_dashboard_handler(auth: SellerAuth) -> HttpResponse {
  HttpResponse::Ok().json(json!({"message": "Seller dashboard", "user": auth.0.user}))
}

pub async fn buyer_dashboard_handler(auth: BuyerAuth) -> HttpResponse {
  HttpResponse::Ok().json(json!({"message": "Buyer dashboard", "user": auth.0.user}))
}

pub async fn admin_dashboard_handler(auth: AdminAuth) -> HttpResponse {
  HttpResponse::Ok().json(json!({"message": "Admin dashboard", "user": auth.0.user}))
}
