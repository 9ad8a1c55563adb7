use actix_files::Files;
use actix_web::web;

use crate::web::handlers::{auth_handlers, product_handlers, seller_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` (and the integration tests) to configure services for
// the Actix App. `upload_dir` backs the static /images mount.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, upload_dir: &str) {
  cfg
    // Health Check Route
    .route("/health", web::get().to(health_check_handler))
    // Authentication Routes
    .route("/login", web::post().to(auth_handlers::login_handler))
    .route("/logout", web::post().to(auth_handlers::logout_handler))
    .route("/check-session", web::get().to(auth_handlers::check_session_handler))
    // Role Routes
    .service(
      web::scope("/seller")
        .route("/register", web::post().to(auth_handlers::register_seller_handler))
        .route("/profile", web::get().to(seller_handlers::get_profile_handler))
        .route("/profile", web::put().to(seller_handlers::update_profile_handler))
        .route("", web::get().to(auth_handlers::seller_dashboard_handler)),
    )
    .service(
      web::scope("/buyer")
        .route("/register", web::post().to(auth_handlers::register_buyer_handler))
        .route("", web::get().to(auth_handlers::buyer_dashboard_handler)),
    )
    .service(
      web::scope("/admin")
        .route("/register", web::post().to(auth_handlers::register_admin_handler))
        .route("", web::get().to(auth_handlers::admin_dashboard_handler)),
    )
    // Product Routes
    .route("/products", web::get().to(product_handlers::list_products_handler))
    .service(
      web::scope("/product")
        .route("", web::post().to(product_handlers::create_product_handler))
        .route("/{id}", web::delete().to(product_handlers::delete_product_handler))
        .route("/{id}/quantity", web::put().to(product_handlers::update_quantity_handler)),
    )
    // Uploaded images are served back verbatim.
    .service(Files::new("/images", upload_dir));
}
