use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub product_id: i64,
  // Wire name kept as the storefront clients expect it.
  #[serde(rename = "Product_name")]
  pub product_name: String,
  pub price: f64,
  pub quantity: i64,
  pub description: Option<String>,
  /// Filename under the image upload directory.
  pub image: String,
}
