pub mod guards;
pub mod handlers;
pub mod routes;
