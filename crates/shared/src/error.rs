use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the catalog service attaches to non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select at least one degree")]
    MissingDegrees,
    #[error("select a campus")]
    MissingCampus,
    #[error("select at least one course")]
    MissingCourses,
}
