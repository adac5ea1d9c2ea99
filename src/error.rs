use std::fmt;

/// Errors returned by fallible frozen map lookups.
///
/// Hashing failures are reported separately as
/// [`Unhashable`](crate::Unhashable), which names the offending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Lookup of a key that is not present. Distinct from a present key
    /// whose value happens to be empty or falsy.
    MissingKey,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingKey => write!(f, "key not found"),
        }
    }
}

impl std::error::Error for Error {}
