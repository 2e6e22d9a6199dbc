// Library exports for chatter
// This allows integration tests and external code to use chatter modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod ids;
pub mod routes;
pub mod state;
