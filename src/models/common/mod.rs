pub mod lenient;
pub mod response;
pub mod status;

pub use response::ApiResponse;
pub use status::ScoringStatus;
