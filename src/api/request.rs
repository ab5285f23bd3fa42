//! # Request Parsing
//!
//! Query parameters and JSON bodies accepted by the trivia endpoints.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::store::NewQuestion;

use super::errors::{ApiError, ApiResult};

/// Questions per page on `GET /questions`
pub const QUESTIONS_PER_PAGE: usize = 10;

/// Body key that turns `POST /questions` into a search
pub const SEARCH_TERM_KEY: &str = "searchTerm";

/// Quiz category id meaning "every category"
pub const ALL_CATEGORIES: i64 = 0;

/// Parse the 1-based `page` query parameter (default 1)
pub fn parse_page(query: &HashMap<String, String>) -> ApiResult<usize> {
    let Some(raw) = query.get("page") else {
        return Ok(1);
    };

    match raw.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::InvalidQueryParam(format!(
            "page must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Slice one page out of an ordered collection.
///
/// Pages past the end yield an empty vector.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(QUESTIONS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

/// What a `POST /questions` body asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionsPost {
    Search(String),
    Create(NewQuestion),
}

impl QuestionsPost {
    /// Classify a body: a `searchTerm` key means search, anything else is an insert
    pub fn from_body(body: Value) -> ApiResult<Self> {
        let Value::Object(mut fields) = body else {
            return Err(ApiError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        };

        if let Some(term) = fields.remove(SEARCH_TERM_KEY) {
            return match term {
                Value::String(term) => Ok(QuestionsPost::Search(term)),
                _ => Err(ApiError::Validation(format!(
                    "{} must be a string",
                    SEARCH_TERM_KEY
                ))),
            };
        }

        serde_json::from_value::<NewQuestion>(Value::Object(fields))
            .map(QuestionsPost::Create)
            .map_err(|e| ApiError::Validation(format!("invalid question: {}", e)))
    }
}

/// Category id as sent by clients: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Number(i64),
    Text(String),
}

impl CategoryId {
    pub fn resolve(&self) -> ApiResult<i64> {
        match self {
            CategoryId::Number(id) => Ok(*id),
            CategoryId::Text(text) => text.trim().parse().map_err(|_| {
                ApiError::Validation(format!("quiz_category id '{}' is not an integer", text))
            }),
        }
    }
}

/// `quiz_category` object. Clients also send the category `type` label,
/// which is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    pub id: CategoryId,
}

/// `POST /quizzes` body
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i64>,
    pub quiz_category: QuizCategory,
}

impl QuizRequest {
    pub fn from_body(body: Value) -> ApiResult<Self> {
        serde_json::from_value(body)
            .map_err(|e| ApiError::Validation(format!("invalid quiz request: {}", e)))
    }

    /// Category to draw from; `None` means all categories
    pub fn category(&self) -> ApiResult<Option<i64>> {
        let id = self.quiz_category.id.resolve()?;
        Ok((id != ALL_CATEGORIES).then_some(id))
    }
}
