pub mod evaluations;

pub mod phases;

pub mod rubrics;

pub mod submissions;

pub mod system;

pub mod tracking;

pub use evaluations::configure_evaluation_routes;
pub use phases::configure_phase_routes;
pub use rubrics::configure_rubric_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use tracking::configure_tracking_routes;
