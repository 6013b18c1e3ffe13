//! # jwtcheck - JWT Claims Validation
//!
//! > Policy checks for the claims of JSON Web Tokens.
//!
//! **jwtcheck** decides whether the claims of a decoded token are acceptable:
//! whether it has expired, is not valid yet, was issued in the future, and
//! whether its audience, issuer and subject are the ones you expect. It sits
//! behind whatever decodes the token and verifies its signature, and reports
//! *every* failed check, not just the first one.
//!
//! ## Quick Start
//!
//! ```
//! use jwtcheck::{ErrorKind, MapClaims, Validator};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let validator = Validator::builder()
//!     .leeway(Duration::from_secs(30))
//!     .audience("api")
//!     .issuer("https://auth.example.com")
//!     .build();
//!
//! let claims: MapClaims = serde_json::from_value(json!({
//!     "iss": "https://auth.example.com",
//!     "aud": ["api", "admin"],
//!     "exp": 4102444800u64,
//! }))
//! .unwrap();
//!
//! assert!(validator.validate(&claims).is_ok());
//! ```
//!
//! ## Claims
//!
//! The validator reads claims through the [`Claims`] trait. Three ways to
//! provide them:
//!
//! - [`MapClaims`]: any JSON object. Registered claims are type-checked when
//!   read; a wrongly typed claim becomes an [`ErrorKind::InvalidType`] failure.
//! - [`RegisteredClaims`]: the registered claims as typed fields.
//! - Your own struct with [`#[claims]`](macro@claims), which adds the registered
//!   fields and implements [`Claims`]:
//!
//! ```
//! use jwtcheck::{BoxError, claims};
//!
//! #[claims(validate_with = check_role)]
//! pub struct AppClaims {
//!     pub role: String,
//! }
//!
//! fn check_role(claims: &AppClaims) -> Result<(), BoxError> {
//!     if claims.role == "admin" || claims.role == "user" {
//!         Ok(())
//!     } else {
//!         Err(format!("unknown role {}", claims.role).into())
//!     }
//! }
//! ```
//!
//! ## Validation
//!
//! | Check | When | Passes if |
//! |-------|------|-----------|
//! | `exp` | always | absent, or `now < exp + leeway` |
//! | `iat` | [`issued_at`](ValidatorBuilder::issued_at) | absent, or `now >= iat - leeway` |
//! | `nbf` | always | absent, or `now >= nbf - leeway` |
//! | `aud` | [`audience`](ValidatorBuilder::audience) | one (or [all](ValidatorBuilder::all_audiences)) expected values present |
//! | `iss` | [`issuer`](ValidatorBuilder::issuer) | equal to the expected issuer |
//! | `sub` | [`subject`](ValidatorBuilder::subject) | equal to, or matching, the expected subject |
//! | custom | always | [`Claims::validate_custom`] returns `Ok` |
//!
//! Failures are collected into a [`ValidationError`], which can be queried by
//! [`ErrorKind`]:
//!
//! ```
//! use jwtcheck::{ErrorKind, RegisteredClaims, Validator};
//!
//! let validator = Validator::builder().issuer("me").subject("user").build();
//! let err = validator.validate(&RegisteredClaims::default()).unwrap_err();
//!
//! assert_eq!(err.len(), 2);
//! assert!(err.contains_all(&[ErrorKind::RequiredClaimMissing]));
//! ```
//!
//! ## Security
//!
//! Issuer, audience and exact subject values are compared in constant time
//! via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq) crate.
//!
//! This crate does not parse or verify tokens. Only validate claims whose
//! signature has already been verified.
//!
//! ## References
//!
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725): JSON Web Token Best Current Practices

// Core modules
pub mod error;
pub mod numeric_date;
pub(crate) mod utils;

// Claims and validation
pub mod claims;
pub mod validator;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use claims::{ClaimStrings, Claims, MapClaims, RegisteredClaims};
pub use error::{BoxError, Error, ErrorKind, Result, ValidationError};
pub use numeric_date::{NumericDate, Precision};
pub use validator::{SubjectMatcher, Validator, ValidatorBuilder};

pub use jwtcheck_derive::claims;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
