pub mod assignments;
pub mod auth;
pub mod grades;
pub mod submissions;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use grades::GradeService;
pub use submissions::SubmissionService;
