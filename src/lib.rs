pub mod app;
pub mod auth;
pub mod config;
pub mod documents;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod routes;
pub mod telemetry;
pub mod utils;
