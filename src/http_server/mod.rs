//! # Trivia HTTP Server Module
//!
//! Combines the trivia and health routers into one Axum server.
//!
//! # Endpoints
//!
//! - `/` - Greeting
//! - `/health` - Health check
//! - `/categories`, `/categories/:id/questions` - Category listings
//! - `/questions`, `/questions/:id` - Listing, search, insert and delete
//! - `/quizzes` - Random quiz question

pub mod config;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
