use super::Error;

/// Error from a label cache while resolving display labels.
///
/// The view never surfaces these; they are degraded to "no label".
#[derive(Debug)]
pub(super) struct LookupError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "label lookup failed: {}", self.inner)
    }
}

impl Error {
    /// Creates a label lookup error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Lookup(LookupError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a label lookup error.
    pub fn is_lookup(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Lookup(_))
    }
}
