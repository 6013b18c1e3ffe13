//! Claims validator
//!
//! A [`Validator`] is configured once through [`ValidatorBuilder`] and can then
//! check any number of [`Claims`], from any number of threads. Validation
//! runs every configured check and reports all failures together:
//!
//! 1. `exp`: passes while `now < exp + leeway`; absent `exp` passes
//! 2. `iat` (opt-in): passes when `now >= iat - leeway`; absent `iat` passes
//! 3. `nbf`: passes when `now >= nbf - leeway`; absent `nbf` passes
//! 4. `aud` (if expected): any, or all, expected values must be present
//! 5. `iss` (if expected): exact match
//! 6. `sub` (if expected): exact or pattern match
//! 7. [`Claims::validate_custom`], always
//!
//! A configured `aud`, `iss` or `sub` expectation turns an absent claim into
//! [`Error::RequiredClaimMissing`].

mod builder;

pub use builder::{SubjectMatcher, ValidatorBuilder};

use crate::claims::Claims;
use crate::error::{Error, Result, ValidationError};
use crate::utils::compare::{contains, strings_eq};
use crate::utils::time::{duration_from_nanos, duration_nanos, unix_nanos};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Source of the current time
pub(crate) type TimeSource = Arc<dyn Fn() -> SystemTime + Send + Sync + 'static>;

/// JWT claims validator
///
/// The validator is configured once and can be reused (and shared across
/// threads) for any number of validations. It does not verify signatures.
///
/// # Examples
///
/// ```
/// use jwtcheck::{ErrorKind, MapClaims, Validator};
/// use serde_json::json;
///
/// let validator = Validator::builder().issuer("https://auth.example.com").build();
///
/// let claims: MapClaims = serde_json::from_value(json!({"exp": 1000})).unwrap();
/// let err = validator.validate(&claims).unwrap_err();
///
/// assert!(err.contains(ErrorKind::Expired));
/// assert!(err.contains(ErrorKind::RequiredClaimMissing));
/// ```
#[derive(Clone)]
pub struct Validator {
    leeway: Duration,
    time_source: Option<TimeSource>,
    verify_issued_at: bool,
    expected_audiences: Vec<String>,
    all_audiences: bool,
    expected_issuer: Option<String>,
    expected_subject: Option<SubjectMatcher>,
}

impl Validator {
    /// Create a validator that only checks `exp`, `nbf` and custom validation
    pub fn new() -> Self {
        ValidatorBuilder::new().build()
    }

    /// Start configuring a validator
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Tolerance applied to the time-based checks
    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Validate claims against this configuration
    ///
    /// Returns every failed check, in evaluation order. Type errors raised
    /// while reading a claim are reported as
    /// [`Error::InvalidType`] in place of the check that read it.
    pub fn validate<C>(&self, claims: &C) -> std::result::Result<(), ValidationError>
    where
        C: Claims + ?Sized,
    {
        let now = self.now();
        let mut errors = ValidationError::new();

        if let Err(err) = self.verify_expiration(claims, now) {
            errors.push(err);
        }

        if self.verify_issued_at {
            if let Err(err) = self.verify_issued_at(claims, now) {
                errors.push(err);
            }
        }

        if let Err(err) = self.verify_not_before(claims, now) {
            errors.push(err);
        }

        if !self.expected_audiences.is_empty() {
            if let Err(err) = self.verify_audience(claims) {
                errors.push(err);
            }
        }

        if let Some(expected) = &self.expected_issuer {
            if let Err(err) = verify_issuer(claims, expected) {
                errors.push(err);
            }
        }

        if let Some(matcher) = &self.expected_subject {
            if let Err(err) = verify_subject(claims, matcher) {
                errors.push(err);
            }
        }

        // Runs regardless of the standard checks above
        if let Err(err) = claims.validate_custom() {
            errors.push(Error::InvalidClaims(err));
        }

        if errors.is_empty() {
            tracing::trace!("claims validated");
        } else {
            tracing::debug!(
                failures = errors.len(),
                kinds = ?errors.kinds(),
                "claims validation failed"
            );
        }

        errors.into_result()
    }

    /// Current time as nanoseconds since the epoch
    fn now(&self) -> i128 {
        let now = match &self.time_source {
            Some(source) => source(),
            None => SystemTime::now(),
        };
        unix_nanos(now)
    }

    fn leeway_nanos(&self) -> i128 {
        duration_nanos(self.leeway)
    }

    fn verify_expiration<C: Claims + ?Sized>(&self, claims: &C, now: i128) -> Result<()> {
        let Some(expires_at) = claims.expiration_time()? else {
            return Ok(());
        };

        let exp = expires_at.unix_nanos();
        if now < exp + self.leeway_nanos() {
            return Ok(());
        }
        Err(Error::Expired {
            expired_at: expires_at,
            overdue: duration_from_nanos(now - exp),
        })
    }

    fn verify_issued_at<C: Claims + ?Sized>(&self, claims: &C, now: i128) -> Result<()> {
        let Some(issued_at) = claims.issued_at()? else {
            return Ok(());
        };

        if now >= issued_at.unix_nanos() - self.leeway_nanos() {
            return Ok(());
        }
        Err(Error::UsedBeforeIssued { issued_at })
    }

    fn verify_not_before<C: Claims + ?Sized>(&self, claims: &C, now: i128) -> Result<()> {
        let Some(not_before) = claims.not_before()? else {
            return Ok(());
        };

        if now >= not_before.unix_nanos() - self.leeway_nanos() {
            return Ok(());
        }
        Err(Error::NotValidYet { not_before })
    }

    fn verify_audience<C: Claims + ?Sized>(&self, claims: &C) -> Result<()> {
        let audience = claims.audience()?;
        // Empty strings count as absent, as they do for `iss` and `sub`
        if audience.iter().all(|aud| aud.is_empty()) {
            return Err(Error::RequiredClaimMissing("aud"));
        }

        // Count every match instead of stopping early
        let matches = self
            .expected_audiences
            .iter()
            .filter(|expected| contains(&audience, expected))
            .count();

        let valid = if self.all_audiences {
            matches == self.expected_audiences.len()
        } else {
            matches > 0
        };
        if valid {
            return Ok(());
        }
        Err(Error::InvalidAudience {
            expected: self.expected_audiences.clone(),
            found: audience.into_iter().map(str::to_string).collect(),
        })
    }
}

fn verify_issuer<C: Claims + ?Sized>(claims: &C, expected: &str) -> Result<()> {
    match claims.issuer()? {
        None | Some("") => Err(Error::RequiredClaimMissing("iss")),
        Some(issuer) if strings_eq(issuer, expected) => Ok(()),
        Some(issuer) => Err(Error::InvalidIssuer {
            expected: expected.to_string(),
            found: issuer.to_string(),
        }),
    }
}

fn verify_subject<C: Claims + ?Sized>(claims: &C, matcher: &SubjectMatcher) -> Result<()> {
    match claims.subject()? {
        None | Some("") => Err(Error::RequiredClaimMissing("sub")),
        Some(subject) if matcher.matches(subject) => Ok(()),
        Some(subject) => Err(Error::InvalidSubject {
            found: subject.to_string(),
        }),
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("leeway", &self.leeway)
            .field(
                "time_source",
                &if self.time_source.is_some() {
                    "custom"
                } else {
                    "system"
                },
            )
            .field("verify_issued_at", &self.verify_issued_at)
            .field("expected_audiences", &self.expected_audiences)
            .field("all_audiences", &self.all_audiences)
            .field("expected_issuer", &self.expected_issuer)
            .field("expected_subject", &self.expected_subject)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ClaimStrings, MapClaims, RegisteredClaims};
    use crate::error::{BoxError, ErrorKind};
    use crate::numeric_date::NumericDate;
    use regex::Regex;
    use serde_json::json;
    use std::time::UNIX_EPOCH;

    const NOW: u64 = 1_700_000_000;

    fn at_now() -> ValidatorBuilder {
        Validator::builder().time_source(|| UNIX_EPOCH + Duration::from_secs(NOW))
    }

    fn now() -> i64 {
        NOW as i64
    }

    fn make_claims(exp: Option<i64>, nbf: Option<i64>, iat: Option<i64>) -> RegisteredClaims {
        RegisteredClaims {
            expires_at: exp.map(NumericDate::from_unix),
            not_before: nbf.map(NumericDate::from_unix),
            issued_at: iat.map(NumericDate::from_unix),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_token() {
        let claims = make_claims(Some(now() + 3600), Some(now() - 60), Some(now()));
        let validator = at_now().issued_at().build();
        assert!(validator.validate(&claims).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let claims = make_claims(Some(now() - 100), None, None);
        let err = at_now().build().validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::Expired]);
        assert!(matches!(
            err.causes()[0],
            Error::Expired { overdue, .. } if overdue == Duration::from_secs(100)
        ));
    }

    #[test]
    fn test_expiration_boundary() {
        let claims = make_claims(Some(now()), None, None);
        let err = at_now().build().validate(&claims).unwrap_err();
        assert!(err.contains(ErrorKind::Expired));

        let claims = make_claims(Some(now() + 1), None, None);
        assert!(at_now().build().validate(&claims).is_ok());
    }

    #[test]
    fn test_absent_expiration_passes() {
        let claims = make_claims(None, None, None);
        assert!(at_now().build().validate(&claims).is_ok());
        assert!(Validator::new().validate(&claims).is_ok());
    }

    #[test]
    fn test_not_yet_valid() {
        let claims = make_claims(None, Some(now() + 100), None);
        let err = at_now().build().validate(&claims).unwrap_err();
        assert!(err.contains(ErrorKind::NotValidYet));

        let validator = at_now().leeway(Duration::from_secs(100)).build();
        assert!(validator.validate(&claims).is_ok());
    }

    #[test]
    fn test_not_before_boundary() {
        let claims = make_claims(None, Some(now()), None);
        assert!(at_now().build().validate(&claims).is_ok());
    }

    #[test]
    fn test_issued_at_is_opt_in() {
        let claims = make_claims(None, None, Some(now() + 120));
        assert!(at_now().build().validate(&claims).is_ok());

        let err = at_now().issued_at().build().validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::UsedBeforeIssued]);

        let validator = at_now().issued_at().leeway(Duration::from_secs(120)).build();
        assert!(validator.validate(&claims).is_ok());
    }

    #[test]
    fn test_leeway() {
        // Token expired 30 seconds ago, but within 60 seconds leeway
        let claims = make_claims(Some(now() - 30), None, None);
        let validator = at_now().leeway(Duration::from_secs(60)).build();
        assert!(validator.validate(&claims).is_ok());

        // Token expired 90 seconds ago, outside 60 seconds leeway
        let claims = make_claims(Some(now() - 90), None, None);
        assert!(validator.validate(&claims).is_err());
    }

    #[test]
    fn test_sub_second_leeway() {
        let claims = make_claims(Some(now()), None, None);
        let validator = at_now().leeway(Duration::from_millis(1)).build();
        assert!(validator.validate(&claims).is_ok());
    }

    #[test]
    fn test_audience_any() {
        let claims = RegisteredClaims {
            audience: ClaimStrings::from("a"),
            ..Default::default()
        };

        let validator = at_now().audiences(["a", "b"]).build();
        assert!(validator.validate(&claims).is_ok());

        let validator = at_now().audiences(["c", "d"]).build();
        let err = validator.validate(&claims).unwrap_err();
        assert!(err.contains(ErrorKind::InvalidAudience));
    }

    #[test]
    fn test_audience_all() {
        let claims = RegisteredClaims {
            audience: ClaimStrings::from("a"),
            ..Default::default()
        };
        let validator = at_now().audiences(["a", "b"]).all_audiences().build();
        let err = validator.validate(&claims).unwrap_err();
        assert!(matches!(
            &err.causes()[0],
            Error::InvalidAudience { expected, found }
                if expected == &["a", "b"] && found == &["a"]
        ));

        let claims = RegisteredClaims {
            audience: ClaimStrings::from_iter(["b", "c", "a"]),
            ..Default::default()
        };
        assert!(validator.validate(&claims).is_ok());
    }

    #[test]
    fn test_audience_missing() {
        let claims = make_claims(None, None, None);
        let err = at_now().audience("a").build().validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::RequiredClaimMissing]);
    }

    #[test]
    fn test_empty_audience_is_missing() {
        let validator = at_now().audience("api").build();

        let claims: MapClaims = serde_json::from_value(json!({"aud": ""})).unwrap();
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::RequiredClaimMissing]);

        let claims: MapClaims = serde_json::from_value(json!({"aud": ["", ""]})).unwrap();
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::RequiredClaimMissing]);

        let claims: MapClaims = serde_json::from_value(json!({"aud": ["", "web"]})).unwrap();
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidAudience]);
    }

    #[test]
    fn test_issuer() {
        let mut claims = RegisteredClaims::default();
        let validator = at_now().issuer("me").build();

        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::RequiredClaimMissing]);

        claims.issuer = Some(String::new());
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::RequiredClaimMissing]);

        claims.issuer = Some("you".to_string());
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidIssuer]);

        claims.issuer = Some("me".to_string());
        assert!(validator.validate(&claims).is_ok());
    }

    #[test]
    fn test_subject() {
        let mut claims = RegisteredClaims {
            subject: Some("user-42".to_string()),
            ..Default::default()
        };

        assert!(at_now().subject("user-42").build().validate(&claims).is_ok());
        let pattern = Regex::new(r"^user-\d+$").unwrap();
        let validator = at_now().subject_pattern(pattern).build();
        assert!(validator.validate(&claims).is_ok());

        claims.subject = Some("admin".to_string());
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidSubject]);

        claims.subject = None;
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::RequiredClaimMissing]);
    }

    #[test]
    fn test_all_failures_reported_in_order() {
        let claims: MapClaims = serde_json::from_value(json!({
            "exp": now() - 10,
            "iat": now() + 10,
            "nbf": now() + 10,
            "aud": "other",
            "iss": "someone",
        }))
        .unwrap();

        let validator = at_now()
            .issued_at()
            .audience("api")
            .issuer("me")
            .subject("user")
            .build();
        let err = validator.validate(&claims).unwrap_err();
        assert_eq!(
            err.kinds(),
            vec![
                ErrorKind::Expired,
                ErrorKind::UsedBeforeIssued,
                ErrorKind::NotValidYet,
                ErrorKind::InvalidAudience,
                ErrorKind::InvalidIssuer,
                ErrorKind::RequiredClaimMissing,
            ]
        );
    }

    #[test]
    fn test_type_errors_are_causes() {
        let claims: MapClaims = serde_json::from_value(json!({
            "exp": "tomorrow",
            "aud": 7,
        }))
        .unwrap();

        let err = at_now().audience("api").build().validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidType, ErrorKind::InvalidType]);
        assert_eq!(
            err.to_string(),
            "invalid type for claim: exp is invalid, invalid type for claim: aud is invalid"
        );
    }

    struct Scoped {
        registered: RegisteredClaims,
        scope: &'static str,
    }

    impl Claims for Scoped {
        fn expiration_time(&self) -> Result<Option<NumericDate>> {
            self.registered.expiration_time()
        }

        fn issued_at(&self) -> Result<Option<NumericDate>> {
            self.registered.issued_at()
        }

        fn not_before(&self) -> Result<Option<NumericDate>> {
            self.registered.not_before()
        }

        fn issuer(&self) -> Result<Option<&str>> {
            self.registered.issuer()
        }

        fn subject(&self) -> Result<Option<&str>> {
            self.registered.subject()
        }

        fn audience(&self) -> Result<Vec<&str>> {
            self.registered.audience()
        }

        fn validate_custom(&self) -> std::result::Result<(), BoxError> {
            if self.scope == "read" {
                Ok(())
            } else {
                Err(format!("scope {} not allowed", self.scope).into())
            }
        }
    }

    #[test]
    fn test_custom_validation() {
        let claims = Scoped {
            registered: make_claims(Some(now() + 60), None, None),
            scope: "write",
        };
        let err = at_now().build().validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidClaims]);
        assert_eq!(
            err.to_string(),
            "token has invalid claims: scope write not allowed"
        );

        let claims = Scoped {
            scope: "read",
            ..claims
        };
        assert!(at_now().build().validate(&claims).is_ok());
    }

    #[test]
    fn test_custom_validation_cannot_skip_standard_checks() {
        let claims = Scoped {
            registered: make_claims(Some(now() - 60), None, None),
            scope: "read",
        };
        let err = at_now().build().validate(&claims).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::Expired]);
    }

    #[test]
    fn test_idempotent() {
        let claims = make_claims(Some(now() - 5), Some(now() + 5), None);
        let validator = at_now().build();
        let first = validator.validate(&claims).unwrap_err().kinds();
        let second = validator.validate(&claims).unwrap_err().kinds();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extreme_values_do_not_panic() {
        let claims = make_claims(Some(i64::MAX), Some(i64::MIN), Some(i64::MIN));
        let validator = at_now().issued_at().leeway(Duration::MAX).build();
        assert!(validator.validate(&claims).is_ok());

        let claims = make_claims(Some(i64::MIN), None, None);
        let err = at_now().build().validate(&claims).unwrap_err();
        assert!(err.contains(ErrorKind::Expired));
    }

    #[test]
    fn test_validator_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Validator>();
    }

    #[test]
    fn test_debug_hides_time_source() {
        let debug = format!("{:?}", at_now().build());
        assert!(debug.contains(r#"time_source: "custom""#));
    }
}
