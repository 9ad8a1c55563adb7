use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::account::SellerProfile;
use crate::state::AppState;
use crate::web::guards::SellerAuth;

/// Fields are optional so that a missing one yields the documented message
/// rather than a generic deserialization failure.
#[derive(Deserialize, Debug)]
pub struct UpdateProfilePayload {
  pub name: Option<String>,
  pub smartcard_id: Option<String>,
  pub hostel: Option<String>,
}

fn seller_id_of(auth: &SellerAuth) -> Result<String, AppError> {
  auth
    .0
    .user
    .role_id
    .clone()
    .ok_or_else(|| AppError::Auth("Session is missing the seller id".to_string()))
}

#[instrument(name = "handler::get_seller_profile", skip_all)]
pub async fn get_profile_handler(
  app_state: web::Data<AppState>,
  auth: SellerAuth,
) -> Result<HttpResponse, AppError> {
  let seller_id = seller_id_of(&auth)?;

  let profile: Option<SellerProfile> = sqlx::query_as(
    "SELECT seller_id, name, email, smartcard_id, hostel FROM sellerdetails WHERE seller_id = ?",
  )
  .bind(&seller_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match profile {
    Some(profile) => Ok(HttpResponse::Ok().json(json!({"success": true, "profile": profile}))),
    None => Err(AppError::NotFound("Seller not found".to_string())),
  }
}

#[instrument(name = "handler::update_seller_profile", skip_all)]
pub async fn update_profile_handler(
  app_state: web::Data<AppState>,
  auth: SellerAuth,
  payload: web::Json<UpdateProfilePayload>,
) -> Result<HttpResponse, AppError> {
  let seller_id = seller_id_of(&auth)?;

  let (name, smartcard_id, hostel) = match (&payload.name, &payload.smartcard_id, &payload.hostel) {
    (Some(name), Some(smartcard_id), Some(hostel))
      if !name.trim().is_empty() && !smartcard_id.trim().is_empty() && !hostel.trim().is_empty() =>
    {
      (name, smartcard_id, hostel)
    }
    _ => return Err(AppError::Validation("All fields are required".to_string())),
  };

  let result = sqlx::query("UPDATE sellerdetails SET name = ?, smartcard_id = ?, hostel = ? WHERE seller_id = ?")
    .bind(name)
    .bind(smartcard_id)
    .bind(hostel)
    .bind(&seller_id)
    .execute(&app_state.db_pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound("Seller not found".to_string()));
  }

  // Keep the session's display name in step with the row.
  let mut user = auth.0.user.clone();
  user.name = Some(name.clone());
  app_state.sessions.update_user(&auth.0.session_id, &user).await?;

  info!(%seller_id, "Profile updated");
  Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Profile updated successfully"})))
}
