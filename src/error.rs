use std::error::Error as StdError;
use std::fmt;

use crate::client::StoreError;

/// Mapping and query engine error.
#[derive(Debug)]
pub enum Error {
    /// Schema rejected at construction time: duplicate attribute names,
    /// conflicting key tags or a missing primary partition key. Fatal and
    /// never retried.
    SchemaValidation(String),
    /// A query or key was issued against an index name the schema does not
    /// declare. Raised at query-construction time.
    UnknownIndex(String),
    /// A required key attribute resolved to a missing or non-scalar native
    /// value while building an item map or a key.
    InvalidKey(String),
    /// A raw attribute variant did not match what a converter expects while
    /// reading a store response. Raised from the page materialization that
    /// detects it, never silently coerced.
    Conversion {
        /// Variant tag the converter expected, e.g. `"N"`.
        expected: &'static str,
        /// Description of what was actually found.
        actual: String,
    },
    /// Transport-layer failure reported by the store client, propagated
    /// unchanged. No retry policy lives in this crate.
    Store(StoreError),
}

impl Error {
    /// Check if the error is a construction-time schema validation failure.
    pub fn is_schema_validation(&self) -> bool {
        matches!(self, Error::SchemaValidation(_))
    }

    /// Check if the error is a reference to an undeclared index.
    pub fn is_unknown_index(&self) -> bool {
        matches!(self, Error::UnknownIndex(_))
    }

    /// Check if the error is a missing or malformed key value.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Error::InvalidKey(_))
    }

    /// Check if the error is an attribute conversion mismatch.
    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Conversion { .. })
    }

    /// Check if the error came from the underlying store client.
    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SchemaValidation(msg) => write!(f, "invalid table schema: {msg}"),
            Error::UnknownIndex(name) => {
                write!(f, "index '{name}' is not declared by the table schema")
            }
            Error::InvalidKey(msg) => write!(f, "invalid key: {msg}"),
            Error::Conversion { expected, actual } => {
                write!(
                    f,
                    "attribute conversion failed: expected {expected}, got {actual}"
                )
            }
            Error::Store(err) => write!(f, "store client error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            _ => None,
        }
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
}

impl_from_error!(StoreError, Store);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_variants() {
        assert!(Error::SchemaValidation("dup".to_string()).is_schema_validation());
        assert!(Error::UnknownIndex("gsi".to_string()).is_unknown_index());
        assert!(Error::InvalidKey("missing".to_string()).is_invalid_key());
        let conv = Error::Conversion {
            expected: "N",
            actual: "BOOL".to_string(),
        };
        assert!(conv.is_conversion());
        assert!(!conv.is_store());
    }

    #[test]
    fn store_errors_keep_their_source() {
        let err: Error = StoreError::new("connection reset").into();
        assert!(err.is_store());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("connection reset"));
    }
}
