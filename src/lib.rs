// Library surface so integration tests can assemble the app the same way the
// binary does.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod web;
