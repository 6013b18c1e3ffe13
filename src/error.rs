//! Error types for claims validation
//!
//! A single failed check is described by [`Error`]. The validator never stops
//! at the first failure: it gathers every cause into a [`ValidationError`],
//! which can be asked whether it contains a given [`ErrorKind`].

use crate::numeric_date::NumericDate;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by custom claim validation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single reason a token was rejected
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Token Errors (produced by the parsing and signing layers)
    // ============================================================================
    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token is unverifiable: {0}")]
    Unverifiable(String),

    #[error("token signature is invalid")]
    SignatureInvalid,

    // ============================================================================
    // Claim Errors
    // ============================================================================
    #[error("token is expired by {overdue:?}")]
    Expired {
        expired_at: NumericDate,
        overdue: Duration,
    },

    #[error("token is not valid yet")]
    NotValidYet { not_before: NumericDate },

    #[error("token used before issued")]
    UsedBeforeIssued { issued_at: NumericDate },

    #[error("token has invalid audience")]
    InvalidAudience {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("token has invalid issuer")]
    InvalidIssuer { expected: String, found: String },

    #[error("token has invalid subject")]
    InvalidSubject { found: String },

    #[error("token is missing required claim: {0} claim is required")]
    RequiredClaimMissing(&'static str),

    #[error("{}", invalid_claims_message(.0))]
    InvalidClaims(#[source] BoxError),

    #[error("invalid type for claim: {0} is invalid")]
    InvalidType(&'static str),
}

fn invalid_claims_message(source: &BoxError) -> String {
    let message = source.to_string();
    if message.is_empty() {
        "token is invalid".to_string()
    } else {
        format!("token has invalid claims: {message}")
    }
}

impl Error {
    /// The identity of this failure, without its context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Malformed(_) => ErrorKind::Malformed,
            Error::Unverifiable(_) => ErrorKind::Unverifiable,
            Error::SignatureInvalid => ErrorKind::SignatureInvalid,
            Error::Expired { .. } => ErrorKind::Expired,
            Error::NotValidYet { .. } => ErrorKind::NotValidYet,
            Error::UsedBeforeIssued { .. } => ErrorKind::UsedBeforeIssued,
            Error::InvalidAudience { .. } => ErrorKind::InvalidAudience,
            Error::InvalidIssuer { .. } => ErrorKind::InvalidIssuer,
            Error::InvalidSubject { .. } => ErrorKind::InvalidSubject,
            Error::RequiredClaimMissing(_) => ErrorKind::RequiredClaimMissing,
            Error::InvalidClaims(_) => ErrorKind::InvalidClaims,
            Error::InvalidType(_) => ErrorKind::InvalidType,
        }
    }

    /// Check whether this error is of the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// The closed set of failure identities
///
/// Only the claim related kinds are produced by [`Validator`](crate::Validator).
/// `Malformed`, `Unverifiable` and `SignatureInvalid` exist so that a token
/// decoding layer can report its failures through the same types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Malformed,
    Unverifiable,
    SignatureInvalid,
    Expired,
    NotValidYet,
    UsedBeforeIssued,
    InvalidAudience,
    InvalidIssuer,
    InvalidSubject,
    RequiredClaimMissing,
    InvalidClaims,
    InvalidType,
}

impl ErrorKind {
    /// Short description shared by every error of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "token is malformed",
            ErrorKind::Unverifiable => "token is unverifiable",
            ErrorKind::SignatureInvalid => "token signature is invalid",
            ErrorKind::Expired => "token is expired",
            ErrorKind::NotValidYet => "token is not valid yet",
            ErrorKind::UsedBeforeIssued => "token used before issued",
            ErrorKind::InvalidAudience => "token has invalid audience",
            ErrorKind::InvalidIssuer => "token has invalid issuer",
            ErrorKind::InvalidSubject => "token has invalid subject",
            ErrorKind::RequiredClaimMissing => "token is missing required claim",
            ErrorKind::InvalidClaims => "token has invalid claims",
            ErrorKind::InvalidType => "invalid type for claim",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every reason a set of claims was rejected, in the order the checks ran
///
/// # Examples
///
/// ```
/// use jwtcheck::{Error, ErrorKind, ValidationError};
///
/// let mut errors = ValidationError::new();
/// errors.push(Error::RequiredClaimMissing("iss"));
/// errors.push(Error::InvalidType("aud"));
///
/// assert!(errors.contains(ErrorKind::RequiredClaimMissing));
/// assert!(errors.contains_all(&[ErrorKind::RequiredClaimMissing, ErrorKind::InvalidType]));
/// assert!(!errors.contains_any(&[ErrorKind::Expired, ErrorKind::NotValidYet]));
/// ```
#[derive(Debug, Default)]
pub struct ValidationError {
    causes: Vec<Error>,
}

impl ValidationError {
    /// Create an empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Record another cause
    pub fn push(&mut self, cause: Error) {
        self.causes.push(cause);
    }

    /// `true` when no cause has been recorded
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    /// Number of recorded causes
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    /// All causes, in evaluation order
    pub fn causes(&self) -> &[Error] {
        &self.causes
    }

    /// Iterate over the causes
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.causes.iter()
    }

    /// Kinds of the recorded causes, in evaluation order
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.causes.iter().map(Error::kind).collect()
    }

    /// Check whether any cause is of the given kind
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.causes.iter().any(|cause| cause.is(kind))
    }

    /// Check whether every one of `kinds` is present
    pub fn contains_all(&self, kinds: &[ErrorKind]) -> bool {
        kinds.iter().all(|kind| self.contains(*kind))
    }

    /// Check whether at least one of `kinds` is present
    pub fn contains_any(&self, kinds: &[ErrorKind]) -> bool {
        kinds.iter().any(|kind| self.contains(*kind))
    }

    /// Find a custom validation error of a concrete type
    ///
    /// Errors returned from [`Claims::validate_custom`](crate::Claims::validate_custom)
    /// are kept as the source of an [`Error::InvalidClaims`] cause.
    pub fn find_source<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.causes.iter().find_map(|cause| match cause {
            Error::InvalidClaims(source) => source.downcast_ref::<E>(),
            _ => None,
        })
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<Error> for ValidationError {
    fn from(cause: Error) -> Self {
        Self {
            causes: vec![cause],
        }
    }
}

impl IntoIterator for ValidationError {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationError {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.iter()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.causes.is_empty() {
            return f.write_str("token is invalid");
        }

        for (i, cause) in self.causes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias for jwtcheck operations
pub type Result<T> = std::result::Result<T, Error>;
