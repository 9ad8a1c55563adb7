pub mod auth_handlers;
pub mod product_handlers;
pub mod seller_handlers;
