//! Application-level errors (wraps domain and infrastructure errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// Application errors are what callers of the document facade see.
///
/// Domain errors surface as [`ApplicationError::Domain`] whether they were
/// raised directly or passed up through the event source.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Infra(InfraError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl From<InfraError> for ApplicationError {
    fn from(e: InfraError) -> Self {
        match e {
            InfraError::Domain(domain) => ApplicationError::Domain(domain),
            other => ApplicationError::Infra(other),
        }
    }
}

impl ApplicationError {
    /// The domain error behind this one, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_wrapped_domain_error_when_converted_then_lifted_to_domain() {
        let infra = InfraError::Domain(DomainError::UnmatchedEnd("a".into()));
        let err = ApplicationError::from(infra);
        assert_eq!(err.as_domain(), Some(&DomainError::UnmatchedEnd("a".into())));
    }

    #[test]
    fn given_io_error_when_converted_then_stays_infra() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ApplicationError::from(InfraError::io("read doc.xml", io));
        assert!(matches!(err, ApplicationError::Infra(InfraError::Io { .. })));
        assert_eq!(err.to_string(), "I/O error: read doc.xml");
    }
}
