use log::warn;

use super::{
    draft::{QuestionDraft, ValidationError},
    location::{DeviceLocator, LocationError},
    store::QuizDraft,
    submit::{self, SubmitError, SubmitReport},
};
use crate::{
    api::QuizBackend,
    model::{Coordinate, QuestionEntry, Token},
};

/// One user authoring one quiz.
///
/// Owns the draft state and turns every failure into a single advisory
/// string, which the next successful operation clears.
pub struct AuthoringSession<B> {
    backend: B,
    token: Option<Token>,
    pub quiz: QuizDraft,
    pub draft: QuestionDraft,
    advisory: Option<String>,
}

impl<B: QuizBackend> AuthoringSession<B> {
    pub fn new(backend: B, token: Option<Token>) -> Self {
        Self {
            backend,
            token,
            quiz: QuizDraft::default(),
            draft: QuestionDraft::default(),
            advisory: None,
        }
    }

    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    pub fn locate_device<L>(&mut self, locator: &mut L) -> Result<(), LocationError>
    where
        L: DeviceLocator + ?Sized,
    {
        let result = self.draft.location.request_device_location(locator);
        self.settle(result, |e| e.to_string())
    }

    pub fn pick_on_map(&mut self, coordinate: Coordinate) {
        self.draft.location.pick_on_map(coordinate);
        self.advisory = None;
    }

    pub fn add_question(&mut self) -> Result<QuestionEntry, ValidationError> {
        let result = self.draft.commit(&mut self.quiz).cloned();
        self.settle(result, |e| e.to_string())
    }

    pub fn submit(&mut self) -> Result<SubmitReport, SubmitError> {
        let result = submit::submit(
            &self.backend,
            self.token.as_ref(),
            &mut self.quiz,
            &mut self.draft,
        );
        self.settle(result, SubmitError::advisory)
    }

    /// Drops the quiz and the whole question draft, location included.
    pub fn abandon(&mut self) {
        self.quiz.reset();
        self.draft.clear();
        self.advisory = None;
    }

    fn settle<T, E>(&mut self, result: Result<T, E>, advise: impl FnOnce(&E) -> String) -> Result<T, E> {
        match &result {
            Ok(_) => self.advisory = None,
            Err(e) => {
                let advisory = advise(e);
                warn!("{}", advisory);
                self.advisory = Some(advisory);
            }
        }
        result
    }
}
