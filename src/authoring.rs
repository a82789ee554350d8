pub mod draft;
pub mod location;
pub mod session;
pub mod store;
pub mod submit;

pub use draft::{QuestionDraft, ValidationError};
pub use location::{DeviceLocator, LocationError, LocationProvider, StaticLocator};
pub use session::AuthoringSession;
pub use store::QuizDraft;
pub use submit::{submit, EmptyQuizError, SubmitError, SubmitReport, Submission};
