//! # Trivia Store
//!
//! Data access layer over the `questions` and `categories` tables.
//!
//! The request handlers only see the [`TriviaStore`] trait; [`SqliteStore`]
//! is the SQLite implementation used by the server and the tests.

pub mod connection;
pub mod errors;
pub mod filter;
pub mod repository;
pub mod schema;
pub mod seed;

pub use connection::DbPath;
pub use errors::{StoreError, StoreResult};
pub use filter::{CategoryFilter, QuestionFilter};
pub use repository::{SqliteStore, TriviaStore};
pub use schema::{Category, NewQuestion, Question, Schema};
pub use seed::seed_sample_data;
