pub mod access;
pub mod evaluations;
pub mod notifications;
pub mod ordering;
pub mod phases;
pub mod rubrics;
pub mod submissions;
pub mod system;
pub mod tracking;

pub use evaluations::EvaluationService;
pub use notifications::{EvaluationFinalized, EvaluationNotifier};
pub use phases::PhaseService;
pub use rubrics::RubricService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use tracking::TrackingService;
