//! # Trivia API Module
//!
//! Request handling for the trivia endpoints: parsing, endpoint logic over
//! the store, JSON envelopes and error mapping.

pub mod errors;
pub mod handler;
pub mod request;
pub mod response;
pub mod routes;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use handler::TriviaHandler;
pub use request::{QuestionsPost, QuizRequest, QUESTIONS_PER_PAGE};
pub use response::{
    CategoriesResponse, CreateResponse, DeleteResponse, QuestionList, QuestionPage, QuizResponse,
};
pub use routes::{trivia_routes, TriviaState};
