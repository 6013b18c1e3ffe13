// Alias to allow macro-generated code to reference jwtcheck:: paths within this crate
use crate as jwtcheck;
use jwtcheck_derive::claims;

/// The registered claim names of RFC 7519 Section 4.1, as typed fields
///
/// Absent claims are skipped when serializing. Use it standalone, or as the
/// template for your own claim struct via [`claims`](crate::claims).
///
/// # Examples
///
/// ```
/// use jwtcheck::{NumericDate, RegisteredClaims, Validator};
///
/// let claims = RegisteredClaims {
///     issuer: Some("https://auth.example.com".into()),
///     expires_at: Some(NumericDate::from_unix(4_102_444_800)),
///     ..Default::default()
/// };
///
/// let validator = Validator::builder().issuer("https://auth.example.com").build();
/// assert!(validator.validate(&claims).is_ok());
/// ```
#[claims]
#[derive(Default, PartialEq)]
pub struct RegisteredClaims {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ClaimStrings, Claims};
    use crate::numeric_date::{NumericDate, Precision};

    #[test]
    fn test_accessors_read_fields() {
        let claims = RegisteredClaims {
            issuer: Some("https://example.com".to_string()),
            subject: Some("user123".to_string()),
            audience: ClaimStrings::from_iter(["a", "b"]),
            expires_at: Some(NumericDate::from_unix(1234567890)),
            not_before: Some(NumericDate::from_unix(1234567800)),
            issued_at: Some(NumericDate::from_unix(1234567800)),
            id: Some("unique-id".to_string()),
        };

        assert_eq!(claims.issuer().unwrap(), Some("https://example.com"));
        assert_eq!(claims.subject().unwrap(), Some("user123"));
        assert_eq!(claims.audience().unwrap(), vec!["a", "b"]);
        assert_eq!(
            claims.expiration_time().unwrap(),
            Some(NumericDate::from_unix(1234567890))
        );
        assert_eq!(
            claims.not_before().unwrap(),
            Some(NumericDate::from_unix(1234567800))
        );
        assert_eq!(
            claims.issued_at().unwrap(),
            Some(NumericDate::from_unix(1234567800))
        );
        assert!(claims.validate_custom().is_ok());
    }

    #[test]
    fn test_serialize_skips_absent() {
        let claims = RegisteredClaims {
            subject: Some("user".to_string()),
            issued_at: Some(
                NumericDate::from_unix_parts(1516239022, 250_000_000)
                    .with_precision(Precision::Millisecond),
            ),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"sub":"user","iat":1516239022.250}"#
        );
    }

    #[test]
    fn test_deserialize() {
        let claims: RegisteredClaims = serde_json::from_str(
            r#"{"iss":"me","aud":"api","exp":1516239022,"jti":"abc","extra":true}"#,
        )
        .unwrap();
        assert_eq!(claims.issuer.as_deref(), Some("me"));
        assert_eq!(claims.audience, ClaimStrings::from("api"));
        assert_eq!(claims.expires_at, Some(NumericDate::from_unix(1516239022)));
        assert_eq!(claims.id.as_deref(), Some("abc"));
        assert_eq!(claims.not_before, None);
    }

    #[test]
    fn test_deserialize_rejects_non_numeric_date() {
        let result = serde_json::from_str::<RegisteredClaims>(r#"{"exp":"soon"}"#);
        assert!(result.is_err());
    }
}
