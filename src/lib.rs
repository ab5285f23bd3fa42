//! trivia-api - a small trivia backend
//!
//! Categories, paginated questions, search, inserts, deletes and random quiz
//! questions over HTTP, stored in SQLite.

pub mod api;
pub mod cli;
pub mod http_server;
pub mod store;
