pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
