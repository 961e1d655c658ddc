//! Error types for the pricing pipeline.
//!
//! Every failure the core can produce maps onto one [`ErrorKind`]. Callers that only
//! care about the category (e.g. a UI showing a message) can match on
//! [`PricingError::kind`] instead of the full enum.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Category of a [`PricingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid training-data location, bad hyper-parameters, or a degenerate
    /// (constant) engineered feature at fit time.
    Configuration,
    /// A ZIP code that is not part of the location table.
    Lookup,
    /// A required raw feature is absent or malformed.
    Schema,
    /// An operation was attempted in the wrong lifecycle state.
    Precondition,
    /// A trained model could not be encoded or decoded.
    Serialization,
}

/// Error type for all pricing operations.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown ZIP code '{zipcode}': not a King County location")]
    Lookup { zipcode: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PricingError {
    /// Returns the taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PricingError::Configuration(_) => ErrorKind::Configuration,
            PricingError::Lookup { .. } => ErrorKind::Lookup,
            PricingError::Schema(_) => ErrorKind::Schema,
            PricingError::Precondition(_) => ErrorKind::Precondition,
            PricingError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    pub(crate) fn missing_field(name: &str) -> Self {
        PricingError::Schema(format!("required feature '{}' is missing", name))
    }

    pub(crate) fn malformed_field(name: &str, detail: impl std::fmt::Display) -> Self {
        PricingError::Schema(format!("feature '{}' is malformed: {}", name, detail))
    }
}

impl From<csv::Error> for PricingError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|pos| format!(" (line {})", pos.line()))
            .unwrap_or_default();
        PricingError::Schema(format!("invalid sales record{}: {}", line, err))
    }
}

impl From<bincode::Error> for PricingError {
    fn from(err: bincode::Error) -> Self {
        PricingError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            PricingError::Configuration("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            PricingError::Lookup {
                zipcode: "10001".into()
            }
            .kind(),
            ErrorKind::Lookup
        );
        assert_eq!(PricingError::Schema("x".into()).kind(), ErrorKind::Schema);
        assert_eq!(
            PricingError::Precondition("x".into()).kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            PricingError::Serialization("x".into()).kind(),
            ErrorKind::Serialization
        );
    }

    #[test]
    fn test_lookup_display_names_zipcode() {
        let err = PricingError::Lookup {
            zipcode: "10001".to_string(),
        };
        assert!(err.to_string().contains("'10001'"));
    }

    #[test]
    fn test_missing_field_is_schema() {
        let err = PricingError::missing_field("grade");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("grade"));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: std::result::Result<String, bincode::Error> =
            bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PricingError = e.into();
            assert_eq!(err.kind(), ErrorKind::Serialization);
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PricingError::Schema("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
