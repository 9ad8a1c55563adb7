use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::product::Product;
use crate::services::upload::{self, PendingImage};
use crate::state::AppState;
use crate::web::guards::SellerAuth;

/// Multipart form for POST /product. Every field is optional here so that
/// missing ones surface as the documented validation messages instead of a
/// generic parse failure.
#[derive(Debug, MultipartForm)]
pub struct NewProductForm {
  #[multipart(rename = "Product_name")]
  pub product_name: Option<Text<String>>,
  pub price: Option<Text<String>>,
  pub quantity: Option<Text<String>>,
  pub description: Option<Text<String>>,
  pub image: Option<TempFile>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  // Raw JSON value so a fractional number can be told apart from an integer.
  pub quantity: serde_json::Value,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = sqlx::query_as(
    "SELECT product_id, product_name, price, quantity, description, image FROM product ORDER BY product_id DESC",
  )
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::create_product", skip_all)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  _auth: SellerAuth,
  MultipartForm(form): MultipartForm<NewProductForm>,
) -> Result<HttpResponse, AppError> {
  // Validation order: presence of name and image, then price, then quantity,
  // then the image's type and size. Nothing is persisted on rejection.
  let product_name = form.product_name.map(|t| t.0).unwrap_or_default();
  let image_file = match form.image {
    Some(file) if !product_name.trim().is_empty() => file,
    _ => return Err(AppError::Validation("Product name & image are required".to_string())),
  };
  let original_name = image_file
    .file_name
    .clone()
    .filter(|name| !name.is_empty())
    .ok_or_else(|| AppError::Validation("Product name & image are required".to_string()))?;

  let price = form
    .price
    .as_deref()
    .map(|p| p.trim())
    .and_then(|p| p.parse::<f64>().ok())
    .filter(|p| p.is_finite() && *p > 0.0)
    .ok_or_else(|| AppError::Validation("Invalid price.".to_string()))?;

  let quantity = form
    .quantity
    .as_deref()
    .map(|q| q.trim())
    .and_then(|q| q.parse::<i64>().ok())
    .filter(|q| *q >= 0)
    .ok_or_else(|| AppError::Validation("Quantity must be a whole number".to_string()))?;

  let ext = upload::validate_image_kind(
    image_file.content_type.as_ref().map(|m| m.essence_str()),
    &original_name,
  )?;
  upload::enforce_size_limit(image_file.size)?;

  let bytes = tokio::fs::read(image_file.file.path())
    .await
    .map_err(|e| AppError::Internal(format!("Failed reading upload buffer: {}", e)))?;
  let image = PendingImage {
    stored_name: upload::stored_image_name(&ext),
    bytes,
  };

  let description = form.description.map(|t| t.0).unwrap_or_default();

  // The row commits only once the image is on disk; a failed write drops the
  // transaction, so neither an orphaned file nor a dangling row survives.
  let mut tx = app_state.db_pool.begin().await?;
  sqlx::query("INSERT INTO product (product_name, price, quantity, description, image) VALUES (?, ?, ?, ?, ?)")
    .bind(&product_name)
    .bind(price)
    .bind(quantity)
    .bind(&description)
    .bind(&image.stored_name)
    .execute(&mut *tx)
    .await?;
  upload::persist(&app_state.config.upload_dir, &image).await?;
  tx.commit().await?;

  info!(product_name = %product_name, image = %image.stored_name, "Product added");
  Ok(HttpResponse::Ok().json(json!({"message": "Product added successfully"})))
}

#[instrument(name = "handler::delete_product", skip(app_state, _auth))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  _auth: SellerAuth,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let result = sqlx::query("DELETE FROM product WHERE product_id = ?")
    .bind(product_id)
    .execute(&app_state.db_pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound("Product not found".to_string()));
  }

  info!(product_id, "Product deleted");
  Ok(HttpResponse::Ok().json(json!({"message": "Product deleted successfully"})))
}

#[instrument(name = "handler::update_quantity", skip(app_state, _auth, payload))]
pub async fn update_quantity_handler(
  app_state: web::Data<AppState>,
  _auth: SellerAuth,
  path: web::Path<i64>,
  payload: web::Json<UpdateQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let quantity = payload
    .quantity
    .as_i64()
    .filter(|q| *q >= 0)
    .ok_or_else(|| AppError::Validation("Quantity must be an integer".to_string()))?;

  sqlx::query("UPDATE product SET quantity = ? WHERE product_id = ?")
    .bind(quantity)
    .bind(product_id)
    .execute(&app_state.db_pool)
    .await?;

  // Unlike DELETE, this route reports success even when no row matched.
  Ok(HttpResponse::Ok().json(json!({"message": "Stock updated"})))
}
