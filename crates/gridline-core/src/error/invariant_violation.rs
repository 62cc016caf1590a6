use super::Error;

/// Error when an operation targets something the view guarantees cannot exist.
///
/// This signals a defect in the calling layer (for example, the staging store
/// tracking an added row the view never saw) rather than a recoverable
/// condition.
#[derive(Debug)]
pub(super) struct InvariantViolationError {
    message: Box<str>,
}

impl std::error::Error for InvariantViolationError {}

impl core::fmt::Display for InvariantViolationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invariant violation: {}", self.message)
    }
}

impl Error {
    /// Creates an invariant violation error.
    pub fn invariant_violation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvariantViolation(
            InvariantViolationError {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invariant violation.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvariantViolation(_))
    }
}
