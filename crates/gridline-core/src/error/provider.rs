use super::Error;

/// Error from an external provider (query results, entity metadata).
#[derive(Debug)]
pub(super) struct ProviderError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a provider failure.
    ///
    /// Provider implementations (HTTP clients, test doubles, ...) should
    /// convert their transport errors through this constructor.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Provider(ProviderError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a provider error.
    pub fn is_provider(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Provider(_))
    }
}
