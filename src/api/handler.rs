//! # Trivia Handler
//!
//! Endpoint logic on top of a [`TriviaStore`]. Every method is synchronous
//! and runs one request's worth of store calls; the HTTP layer decides which
//! thread that happens on.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::store::{QuestionFilter, TriviaStore};

use super::errors::{ApiError, ApiResult};
use super::request::{paginate, QuestionsPost, QuizRequest};
use super::response::{
    category_map, CategoriesResponse, CreateResponse, DeleteResponse, QuestionList, QuestionPage,
    QuestionsPostResponse, QuizResponse, DEFAULT_CURRENT_CATEGORY,
};

/// Request handler generic over the store implementation
pub struct TriviaHandler<S: TriviaStore> {
    store: Arc<S>,
}

impl<S: TriviaStore> Clone for TriviaHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TriviaStore> TriviaHandler<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared(Arc::new(store))
    }

    pub fn with_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All categories keyed by id
    pub fn list_categories(&self) -> ApiResult<CategoriesResponse> {
        let categories = category_map(self.store.find_categories()?);
        Ok(CategoriesResponse { categories })
    }

    /// One page of questions plus the category map
    pub fn list_questions(&self, page: usize) -> ApiResult<QuestionPage> {
        let questions = self.store.find_questions()?;
        let total_questions = questions.len();
        let categories = category_map(self.store.find_categories()?);

        Ok(QuestionPage {
            categories,
            questions: paginate(questions, page),
            total_questions,
            current_category: DEFAULT_CURRENT_CATEGORY.to_string(),
        })
    }

    /// Permanently remove a question
    pub fn delete_question(&self, id: i64) -> ApiResult<DeleteResponse> {
        if !self.store.delete_question(id)? {
            return Err(ApiError::NotFound(format!("Question {} not found", id)));
        }

        tracing::info!(question_id = id, "Deleted question");
        Ok(DeleteResponse::new(id))
    }

    /// `POST /questions`: search when the body has a search term, insert otherwise
    pub fn post_questions(&self, body: Value) -> ApiResult<QuestionsPostResponse> {
        match QuestionsPost::from_body(body)? {
            QuestionsPost::Search(term) => self.search_questions(&term).map(QuestionsPostResponse::Search),
            QuestionsPost::Create(question) => {
                let id = self.store.insert_question(&question)?;
                tracing::info!(question_id = id, category = question.category, "Created question");
                Ok(QuestionsPostResponse::Created(CreateResponse::new(id)))
            }
        }
    }

    /// Case-insensitive substring search over question text
    pub fn search_questions(&self, term: &str) -> ApiResult<QuestionList> {
        let filter = QuestionFilter::all().containing(term);
        let questions = self.store.find_questions_where(&filter)?;
        Ok(QuestionList::new(questions, DEFAULT_CURRENT_CATEGORY))
    }

    /// Questions in one category
    pub fn questions_by_category(&self, category_id: i64) -> ApiResult<QuestionList> {
        let category = self
            .store
            .find_category(category_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Category {} not found", category_id)))?;

        let filter = QuestionFilter::all().in_category(category_id);
        let questions = self.store.find_questions_where(&filter)?;
        Ok(QuestionList::new(questions, category.kind))
    }

    /// Draw a random unseen question from the requested category
    pub fn next_quiz_question<R: Rng + ?Sized>(
        &self,
        body: Value,
        rng: &mut R,
    ) -> ApiResult<QuizResponse> {
        let request = QuizRequest::from_body(body)?;

        let mut filter = QuestionFilter::all().excluding(request.previous_questions.iter().copied());
        if let Some(category) = request.category()? {
            filter = filter.in_category(category);
        }

        let candidates = self.store.find_questions_where(&filter)?;
        let question = candidates.choose(rng).cloned();

        tracing::debug!(
            candidates = candidates.len(),
            seen = request.previous_questions.len(),
            exhausted = question.is_none(),
            "Quiz draw"
        );

        Ok(QuizResponse { question })
    }
}
