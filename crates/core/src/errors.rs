use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("iteration count {count} outside of 1..={max}")]
    IterationCountOutOfRange { count: u32, max: u32 },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("answer generation failed: {0}")]
    Generation(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("answer unavailable: {message}")]
    AnswerUnavailable { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AnswerUnavailable { .. } => "Could not produce an answer. Please try again.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::AnswerUnavailable { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::AnswerUnavailable { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::Internal {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Generation(message) => {
                Self::AnswerUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn out_of_range_iteration_count_is_an_internal_fault() {
        let interface =
            ApplicationError::from(DomainError::IterationCountOutOfRange { count: 4, max: 3 })
                .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::Internal {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message == "iteration count 4 outside of 1..=3"
        ));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn generation_failure_asks_the_user_to_try_again() {
        let interface = ApplicationError::Generation("connection refused".to_owned())
            .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::AnswerUnavailable { .. }));
        assert_eq!(interface.user_message(), "Could not produce an answer. Please try again.");
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn persistence_error_maps_to_service_unavailable() {
        let interface = ApplicationError::Persistence("database lock timeout".to_owned())
            .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
    }
}
