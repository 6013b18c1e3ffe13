//! Claim representations and the capability trait the validator reads
//!
//! Two representations are provided:
//!
//! - [`MapClaims`]: an open, ordered map of JSON values; accessors interpret
//!   the stored value on demand and fail with [`Error::InvalidType`] when a
//!   registered claim holds the wrong JSON type.
//! - [`RegisteredClaims`]: the IANA registered claims as typed fields.
//!
//! Application specific claim structs get the registered fields and a
//! [`Claims`] implementation from the [`claims`](crate::claims) attribute.
//!
//! [`Error::InvalidType`]: crate::Error::InvalidType

mod map;
mod registered;
mod strings;

pub use map::MapClaims;
pub use registered::RegisteredClaims;
pub use strings::ClaimStrings;

use crate::error::{BoxError, Result};
use crate::numeric_date::NumericDate;

/// Read access to the registered claims of a token
///
/// See [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1).
/// Absent claims are `None` (or an empty audience); an empty issuer or
/// subject string is treated as absent by the [`Validator`](crate::Validator).
pub trait Claims {
    /// Expiration Time (exp) - the time on or after which the token is rejected
    fn expiration_time(&self) -> Result<Option<NumericDate>>;
    /// Issued At (iat) - the time at which the token was issued
    fn issued_at(&self) -> Result<Option<NumericDate>>;
    /// Not Before (nbf) - the time before which the token is rejected
    fn not_before(&self) -> Result<Option<NumericDate>>;
    /// Issuer (iss) - the principal that issued the token
    fn issuer(&self) -> Result<Option<&str>>;
    /// Subject (sub) - the principal the token is about
    fn subject(&self) -> Result<Option<&str>>;
    /// Audience (aud) - the recipients the token is intended for
    fn audience(&self) -> Result<Vec<&str>>;

    /// Application specific validation
    ///
    /// Always called by [`Validator::validate`](crate::Validator::validate) after
    /// the standard checks, whatever their outcome. A returned error is
    /// reported as [`Error::InvalidClaims`](crate::Error::InvalidClaims) with the
    /// original error as its source.
    fn validate_custom(&self) -> std::result::Result<(), BoxError> {
        Ok(())
    }
}

impl<C: Claims + ?Sized> Claims for &C {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        (**self).expiration_time()
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        (**self).issued_at()
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        (**self).not_before()
    }

    fn issuer(&self) -> Result<Option<&str>> {
        (**self).issuer()
    }

    fn subject(&self) -> Result<Option<&str>> {
        (**self).subject()
    }

    fn audience(&self) -> Result<Vec<&str>> {
        (**self).audience()
    }

    fn validate_custom(&self) -> std::result::Result<(), BoxError> {
        (**self).validate_custom()
    }
}

impl<C: Claims + ?Sized> Claims for Box<C> {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        (**self).expiration_time()
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        (**self).issued_at()
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        (**self).not_before()
    }

    fn issuer(&self) -> Result<Option<&str>> {
        (**self).issuer()
    }

    fn subject(&self) -> Result<Option<&str>> {
        (**self).subject()
    }

    fn audience(&self) -> Result<Vec<&str>> {
        (**self).audience()
    }

    fn validate_custom(&self) -> std::result::Result<(), BoxError> {
        (**self).validate_custom()
    }
}
