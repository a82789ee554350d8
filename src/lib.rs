//! Client for the Quiztopia geolocation quiz service.
//!
//! Quizzes are authored locally (`authoring`), submitted one question at a
//! time through a [`api::QuizBackend`], and browsed or deleted through
//! [`listing::QuizList`].

pub mod api;
pub mod authoring;
pub mod config;
pub mod error;
pub mod listing;
pub mod model;
pub mod token_store;

pub use config::Config;
pub use error::{FetchError, PersistenceError};
pub use model::{Coordinate, PersistedQuiz, QuestionEntry, Token};
