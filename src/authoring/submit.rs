use log::{debug, info, warn};
use std::slice;
use thiserror::Error;

use super::{draft::QuestionDraft, store::QuizDraft};
use crate::{
    api::QuizBackend,
    error::PersistenceError,
    model::{QuestionEntry, QuestionRecord, Token},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Please add at least one question")]
pub struct EmptyQuizError;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Empty(#[from] EmptyQuizError),

    /// `saved` questions went through before this one failed; they stay on
    /// the backend.
    #[error("question {} of {total} was not saved: {source}", .saved + 1)]
    Persistence {
        saved: usize,
        total: usize,
        #[source]
        source: PersistenceError,
    },
}

impl SubmitError {
    pub fn advisory(&self) -> String {
        match self {
            SubmitError::Empty(e) => e.to_string(),
            SubmitError::Persistence { source, .. } => source.advisory(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub quiz_name: String,
    pub submitted: usize,
}

/// Posts the entries of a quiz one at a time, in authoring order.
///
/// Each call to `next` sends exactly one request and waits for its answer,
/// so a request is never sent before the previous one was answered. The
/// first failure is yielded and ends the iteration.
pub struct Submission<'a, B: ?Sized> {
    backend: &'a B,
    token: Option<&'a Token>,
    name: &'a str,
    entries: slice::Iter<'a, QuestionEntry>,
    failed: bool,
}

impl<'a, B: QuizBackend + ?Sized> Submission<'a, B> {
    pub fn new(backend: &'a B, token: Option<&'a Token>, quiz: &'a QuizDraft) -> Self {
        Self {
            backend,
            token,
            name: quiz.name(),
            entries: quiz.entries().iter(),
            failed: false,
        }
    }
}

impl<'a, B: QuizBackend + ?Sized> Iterator for Submission<'a, B> {
    type Item = Result<&'a QuestionEntry, PersistenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = self.entries.next()?;

        let record = QuestionRecord::new(self.name, entry);
        match self.backend.add_question(self.token, &record) {
            Ok(_) => {
                debug!("saved question '{}' of quiz '{}'", entry.question(), self.name);
                Some(Ok(entry))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(PersistenceError::AddQuestion(e)))
            }
        }
    }
}

impl<'a, B: QuizBackend + ?Sized> std::iter::FusedIterator for Submission<'a, B> {}

/// Submits the whole quiz.
///
/// On success the quiz and the question draft are emptied. On failure both
/// are left as they were so the user can retry; questions saved before the
/// failure are not withdrawn, so a retry posts them a second time.
pub fn submit<B>(
    backend: &B,
    token: Option<&Token>,
    quiz: &mut QuizDraft,
    draft: &mut QuestionDraft,
) -> Result<SubmitReport, SubmitError>
where
    B: QuizBackend + ?Sized,
{
    if !quiz.has_entries() {
        return Err(EmptyQuizError.into());
    }

    let total = quiz.len();
    let mut saved = 0;
    for outcome in Submission::new(backend, token, quiz) {
        if let Err(source) = outcome {
            warn!(
                "quiz '{}' stopped after {} of {} questions: {}",
                quiz.name(),
                saved,
                total,
                source
            );
            return Err(SubmitError::Persistence {
                saved,
                total,
                source,
            });
        }
        saved += 1;
    }

    let report = SubmitReport {
        quiz_name: quiz.name().to_string(),
        submitted: saved,
    };
    info!("quiz '{}' saved with {} questions", report.quiz_name, saved);

    quiz.reset();
    draft.clear();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{server_error, Call, FakeBackend};
    use pretty_assertions::assert_eq;

    fn quiz_with(name: &str, questions: &[&str]) -> (QuizDraft, QuestionDraft) {
        let mut quiz = QuizDraft::new(name);
        let mut draft = QuestionDraft::default();
        draft.location.pick_on_map("48.8566,2.3522".parse().unwrap());
        for q in questions {
            draft.question = q.to_string();
            draft.answer = format!("answer to {}", q);
            draft.commit(&mut quiz).unwrap();
        }
        (quiz, draft)
    }

    #[test]
    fn empty_quiz_sends_nothing() {
        let backend = FakeBackend::new();
        let (mut quiz, mut draft) = quiz_with("Geo Quiz", &[]);

        let err = submit(&backend, None, &mut quiz, &mut draft).unwrap_err();

        assert!(matches!(err, SubmitError::Empty(EmptyQuizError)));
        assert_eq!(err.advisory(), "Please add at least one question");
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn posts_in_authoring_order_then_resets() {
        let backend = FakeBackend::new();
        let token = Token::new("t0k3n");
        let (mut quiz, mut draft) = quiz_with("Geo Quiz", &["A", "B", "C"]);
        draft.question = "half typed".into();

        let report = submit(&backend, Some(&token), &mut quiz, &mut draft).unwrap();

        assert_eq!(
            report,
            SubmitReport {
                quiz_name: "Geo Quiz".into(),
                submitted: 3
            }
        );
        assert_eq!(backend.added(), vec!["A", "B", "C"]);
        assert!(backend.calls.borrow().iter().all(|c| matches!(
            c,
            Call::AddQuestion { name, .. } if name == "Geo Quiz"
        )));
        assert_eq!(
            *backend.tokens.borrow(),
            vec![Some("t0k3n".to_string()); 3]
        );
        assert_eq!(quiz, QuizDraft::default());
        assert_eq!(draft.question, "");
        assert!(draft.location.candidate().is_none());
    }

    #[test]
    fn each_request_waits_for_the_previous_answer() {
        let backend = FakeBackend::new();
        let (quiz, _) = quiz_with("Geo Quiz", &["A", "B", "C"]);
        let mut submission = Submission::new(&backend, None, &quiz);

        assert!(backend.added().is_empty());
        assert_eq!(submission.next().unwrap().unwrap().question(), "A");
        assert_eq!(backend.added(), vec!["A"]);
        assert_eq!(submission.next().unwrap().unwrap().question(), "B");
        assert_eq!(backend.added(), vec!["A", "B"]);
    }

    #[test]
    fn stops_at_first_failure_without_touching_the_draft() {
        let backend = FakeBackend::new().fail_add(1, server_error(500, None));
        let (mut quiz, mut draft) = quiz_with("Geo Quiz", &["A", "B", "C"]);
        let before = quiz.clone();

        let err = submit(&backend, None, &mut quiz, &mut draft).unwrap_err();

        assert!(matches!(err, SubmitError::Persistence { saved: 1, total: 3, .. }));
        assert_eq!(err.advisory(), "Failed to add question");
        assert_eq!(backend.added(), vec!["A", "B"]);
        assert_eq!(quiz, before);
        assert!(draft.location.candidate().is_some());
    }

    #[test]
    fn relays_backend_message() {
        let backend = FakeBackend::new().fail_add(0, server_error(500, Some("db down")));
        let (mut quiz, mut draft) = quiz_with("Geo Quiz", &["E1", "E2"]);

        let err = submit(&backend, None, &mut quiz, &mut draft).unwrap_err();

        assert_eq!(err.advisory(), "db down");
        assert_eq!(backend.added(), vec!["E1"]);
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.name(), "Geo Quiz");
    }

    #[test]
    fn retry_after_partial_failure_posts_earlier_questions_again() {
        let backend = FakeBackend::new().fail_add(1, server_error(503, None));
        let (mut quiz, mut draft) = quiz_with("Geo Quiz", &["A", "B"]);

        assert!(submit(&backend, None, &mut quiz, &mut draft).is_err());
        submit(&backend, None, &mut quiz, &mut draft).unwrap();

        assert_eq!(backend.added(), vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn missing_token_is_sent_anyway() {
        let backend = FakeBackend::new().fail_add(0, server_error(401, Some("Unauthorized")));
        let (mut quiz, mut draft) = quiz_with("Geo Quiz", &["A"]);

        let err = submit(&backend, None, &mut quiz, &mut draft).unwrap_err();

        assert_eq!(*backend.tokens.borrow(), vec![None]);
        assert_eq!(err.advisory(), "Unauthorized");
    }
}
