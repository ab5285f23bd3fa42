//! # Trivia HTTP Routes
//!
//! Axum handlers for the trivia endpoints. Store work runs on the blocking
//! pool under a timeout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;

use crate::store::TriviaStore;

use super::errors::{ApiError, ApiResult};
use super::handler::TriviaHandler;
use super::request::parse_page;
use super::response::{
    CategoriesResponse, DeleteResponse, MessageResponse, QuestionList, QuestionPage,
    QuestionsPostResponse, QuizResponse,
};

/// State shared by the trivia routes
pub struct TriviaState<S: TriviaStore> {
    pub handler: TriviaHandler<S>,
    pub store_timeout: Duration,
}

impl<S: TriviaStore> TriviaState<S> {
    pub fn new(handler: TriviaHandler<S>, store_timeout: Duration) -> Self {
        Self {
            handler,
            store_timeout,
        }
    }
}

type SharedState<S> = Arc<TriviaState<S>>;

/// Trivia routes with shared state
pub fn trivia_routes<S: TriviaStore + 'static>(state: Arc<TriviaState<S>>) -> Router {
    Router::new()
        .route("/", get(hello_handler))
        .route("/categories", get(list_categories_handler::<S>))
        .route(
            "/categories/:category_id/questions",
            get(questions_by_category_handler::<S>),
        )
        .route(
            "/questions",
            get(list_questions_handler::<S>).post(post_questions_handler::<S>),
        )
        .route("/questions/:question_id", delete(delete_question_handler::<S>))
        .route("/quizzes", post(quiz_handler::<S>))
        .with_state(state)
}

/// Run handler logic on the blocking pool, bounded by the store timeout
async fn run_blocking<S, T, F>(state: &SharedState<S>, op: F) -> ApiResult<T>
where
    S: TriviaStore + 'static,
    T: Send + 'static,
    F: FnOnce(&TriviaHandler<S>) -> ApiResult<T> + Send + 'static,
{
    let handler = state.handler.clone();
    let task = tokio::task::spawn_blocking(move || op(&handler));

    match tokio::time::timeout(state.store_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(ApiError::Internal(format!(
            "Store task failed: {}",
            join_err
        ))),
        Err(_) => Err(ApiError::StoreTimeout(state.store_timeout)),
    }
}

/// Run a mutating operation on the blocking pool.
///
/// The timeout only applies while the work is still queued. A write that has
/// started runs to completion and its own result is returned, so a 503 means
/// nothing was written.
async fn run_write<S, T, F>(state: &SharedState<S>, op: F) -> ApiResult<T>
where
    S: TriviaStore + 'static,
    T: Send + 'static,
    F: FnOnce(&TriviaHandler<S>) -> ApiResult<T> + Send + 'static,
{
    let handler = state.handler.clone();
    let claimed = Arc::new(AtomicBool::new(false));
    let task_claim = Arc::clone(&claimed);
    let mut task = tokio::task::spawn_blocking(move || {
        if task_claim.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(op(&handler))
    });

    let waited = tokio::time::timeout(state.store_timeout, &mut task).await;
    let joined = match waited {
        Ok(joined) => joined,
        Err(_) => {
            if !claimed.swap(true, Ordering::AcqRel) {
                return Err(ApiError::StoreTimeout(state.store_timeout));
            }
            tracing::warn!(
                timeout_ms = state.store_timeout.as_millis() as u64,
                "Write outlived the store timeout, waiting for it to finish"
            );
            task.await
        }
    };

    match joined {
        Ok(Some(result)) => result,
        Ok(None) => Err(ApiError::StoreTimeout(state.store_timeout)),
        Err(join_err) => Err(ApiError::Internal(format!(
            "Store task failed: {}",
            join_err
        ))),
    }
}

/// Integer path segment; anything else is treated as an unknown route
fn path_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::NotFound(format!("Resource not found: {}", rejection)))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

// ==================
// Handlers
// ==================

async fn hello_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello world".to_string(),
    })
}

async fn list_categories_handler<S: TriviaStore + 'static>(
    State(state): State<SharedState<S>>,
) -> ApiResult<Json<CategoriesResponse>> {
    let response = run_blocking(&state, |h| h.list_categories()).await?;
    Ok(Json(response))
}

async fn list_questions_handler<S: TriviaStore + 'static>(
    State(state): State<SharedState<S>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Json<QuestionPage>> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQueryParam(rejection.body_text()))?;
    let page = parse_page(&query)?;
    let response = run_blocking(&state, move |h| h.list_questions(page)).await?;
    Ok(Json(response))
}

async fn delete_question_handler<S: TriviaStore + 'static>(
    State(state): State<SharedState<S>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = path_id(path)?;
    let response = run_write(&state, move |h| h.delete_question(id)).await?;
    Ok(Json(response))
}

async fn post_questions_handler<S: TriviaStore + 'static>(
    State(state): State<SharedState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<QuestionsPostResponse>> {
    let body = json_body(body)?;
    let response = run_write(&state, move |h| h.post_questions(body)).await?;
    Ok(Json(response))
}

async fn questions_by_category_handler<S: TriviaStore + 'static>(
    State(state): State<SharedState<S>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<QuestionList>> {
    let category_id = path_id(path)?;
    let response = run_blocking(&state, move |h| h.questions_by_category(category_id)).await?;
    Ok(Json(response))
}

async fn quiz_handler<S: TriviaStore + 'static>(
    State(state): State<SharedState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<QuizResponse>> {
    let body = json_body(body)?;
    let response = run_blocking(&state, move |h| {
        h.next_quiz_question(body, &mut rand::thread_rng())
    })
    .await?;
    Ok(Json(response))
}
