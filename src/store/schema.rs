//! Table definitions and row mappings.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use super::errors::StoreResult;

/// Schema management.
pub struct Schema;

impl Schema {
    /// Create both tables and their index.
    ///
    /// Safe to run against an existing database; nothing is dropped.
    pub fn init(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                category INTEGER NOT NULL REFERENCES categories(id),
                difficulty INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);",
        )?;
        Ok(())
    }

    /// Check whether both tables exist.
    pub fn is_initialized(conn: &Connection) -> StoreResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('categories', 'questions')",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 2)
    }
}

/// A stored trivia question.
///
/// Field order is the order clients see in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

impl Question {
    pub(crate) const COLUMNS: &'static str = "id, question, answer, difficulty, category";

    /// Map a row selected with [`Question::COLUMNS`].
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            question: row.get("question")?,
            answer: row.get("answer")?,
            difficulty: row.get("difficulty")?,
            category: row.get("category")?,
        })
    }
}

/// Payload for inserting a question; the id is generated by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// A question category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Category {
    pub(crate) const COLUMNS: &'static str = "id, type";

    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            kind: row.get("type")?,
        })
    }
}
