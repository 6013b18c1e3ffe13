//! Application claim structs built with the `#[claims]` attribute

use jwtcheck::*;
use std::time::{Duration, UNIX_EPOCH};

const NOW: i64 = 1_516_239_022;

#[derive(Debug, thiserror::Error)]
#[error("tenant {0} is not allowed")]
struct TenantError(String);

fn check_tenant(claims: &TenantClaims) -> std::result::Result<(), BoxError> {
    if claims.tenant == "acme" {
        Ok(())
    } else {
        Err(Box::new(TenantError(claims.tenant.clone())))
    }
}

#[claims(validate_with = check_tenant)]
pub struct TenantClaims {
    pub tenant: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[claims]
#[derive(PartialEq)]
struct PlainClaims {
    role: Option<String>,
}

fn validator() -> Validator {
    Validator::builder()
        .time_source(|| UNIX_EPOCH + Duration::from_secs(NOW as u64))
        .audience("api")
        .build()
}

#[test]
fn custom_failure_reported_when_standard_checks_pass() {
    let claims: TenantClaims = serde_json::from_str(&format!(
        r#"{{"aud":"api","exp":{},"tenant":"globex"}}"#,
        NOW + 60
    ))
    .unwrap();

    let err = validator().validate(&claims).unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::InvalidClaims]);

    let source = err.find_source::<TenantError>().expect("tenant error kept");
    assert_eq!(source.0, "globex");
    assert_eq!(
        err.to_string(),
        "token has invalid claims: tenant globex is not allowed"
    );
}

#[test]
fn custom_failure_added_to_standard_failures() {
    let claims: TenantClaims = serde_json::from_str(&format!(
        r#"{{"aud":"web","exp":{},"tenant":"globex"}}"#,
        NOW - 60
    ))
    .unwrap();

    let err = validator().validate(&claims).unwrap_err();
    assert_eq!(
        err.kinds(),
        vec![
            ErrorKind::Expired,
            ErrorKind::InvalidAudience,
            ErrorKind::InvalidClaims
        ]
    );
}

#[test]
fn valid_custom_claims() {
    let claims: TenantClaims = serde_json::from_str(&format!(
        r#"{{"aud":["api"],"exp":{},"tenant":"acme","scopes":["read"]}}"#,
        NOW + 60
    ))
    .unwrap();

    assert!(validator().validate(&claims).is_ok());
    assert_eq!(claims.scopes, vec!["read"]);
}

#[test]
fn generated_fields_round_trip() {
    let claims = PlainClaims {
        issuer: Some("me".to_string()),
        subject: None,
        audience: ClaimStrings::from("api"),
        expires_at: Some(NumericDate::from_unix(NOW)),
        not_before: None,
        issued_at: None,
        id: None,
        role: Some("admin".to_string()),
    };

    let json = serde_json::to_string(&claims).unwrap();
    assert_eq!(
        json,
        r#"{"iss":"me","aud":["api"],"exp":1516239022,"role":"admin"}"#
    );

    let decoded: PlainClaims = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, claims);
    assert_eq!(decoded.issuer().unwrap(), Some("me"));
    assert_eq!(decoded.audience().unwrap(), vec!["api"]);
    assert!(decoded.validate_custom().is_ok());
}

#[test]
fn generated_claims_checked_by_validator() {
    let claims: PlainClaims = serde_json::from_str(r#"{"aud":"api","nbf":1516239122}"#).unwrap();
    let err = validator().validate(&claims).unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::NotValidYet]);
}
