use serde::{Deserialize, Serialize};

/// Outcome of one critic evaluation. Lives only for the duration of a refinement round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticVerdict {
    pub approved: bool,
    pub feedback: String,
}

impl CriticVerdict {
    /// The verdict used whenever the critic cannot be understood or reached.
    pub fn fail_open() -> Self {
        Self { approved: true, feedback: String::new() }
    }

    pub fn rejected(feedback: impl Into<String>) -> Self {
        Self { approved: false, feedback: feedback.into() }
    }
}
