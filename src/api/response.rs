//! # Response Envelopes
//!
//! JSON bodies returned by the trivia endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::{Category, Question};

/// Label reported as `current_category` by endpoints not scoped to a category
pub const DEFAULT_CURRENT_CATEGORY: &str = "History";

/// Category id → type label, serialized in ascending id order
pub type CategoryMap = BTreeMap<i64, String>;

/// Build a [`CategoryMap`] from store rows
pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

/// `GET /categories`
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: CategoryMap,
}

/// `GET /questions`
#[derive(Debug, Clone, Serialize)]
pub struct QuestionPage {
    pub categories: CategoryMap,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

/// Search results and per-category listings
#[derive(Debug, Clone, Serialize)]
pub struct QuestionList {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

impl QuestionList {
    /// Wrap a result set; the total is the size of that set
    pub fn new(questions: Vec<Question>, current_category: impl Into<String>) -> Self {
        let total_questions = questions.len();
        Self {
            questions,
            total_questions,
            current_category: current_category.into(),
        }
    }
}

/// `DELETE /questions/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

impl DeleteResponse {
    pub fn new(deleted_id: i64) -> Self {
        Self {
            success: true,
            deleted_id,
        }
    }
}

/// Successful question insert
#[derive(Debug, Clone, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub created: i64,
}

impl CreateResponse {
    pub fn new(created: i64) -> Self {
        Self {
            success: true,
            created,
        }
    }
}

/// `POST /questions` answers either a search or an insert
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuestionsPostResponse {
    Search(QuestionList),
    Created(CreateResponse),
}

/// `POST /quizzes`; `question` is `null` once the pool is exhausted
#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub question: Option<Question>,
}

/// Plain message body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
