//! Validator configuration
//!
//! Every option is independent; an option that is never set imposes no
//! constraint. `iat` is not verified unless [`ValidatorBuilder::issued_at`] is
//! called, since RFC 7519 Section 4.1.6 makes it informational.

use crate::utils::compare::strings_eq;
use crate::validator::{TimeSource, Validator};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// How the `sub` claim is matched
#[derive(Debug, Clone)]
pub enum SubjectMatcher {
    /// The subject must equal this value
    Exact(String),
    /// The subject must match this regular expression
    ///
    /// The pattern is not anchored implicitly; use `^...$` for a full match.
    Pattern(Regex),
}

impl SubjectMatcher {
    /// Check a subject against this matcher
    pub fn matches(&self, subject: &str) -> bool {
        match self {
            SubjectMatcher::Exact(expected) => strings_eq(subject, expected),
            SubjectMatcher::Pattern(pattern) => pattern.is_match(subject),
        }
    }
}

impl fmt::Display for SubjectMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectMatcher::Exact(expected) => f.write_str(expected),
            SubjectMatcher::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

impl From<&str> for SubjectMatcher {
    fn from(value: &str) -> Self {
        SubjectMatcher::Exact(value.to_string())
    }
}

impl From<String> for SubjectMatcher {
    fn from(value: String) -> Self {
        SubjectMatcher::Exact(value)
    }
}

impl From<Regex> for SubjectMatcher {
    fn from(pattern: Regex) -> Self {
        SubjectMatcher::Pattern(pattern)
    }
}

/// Builder for [`Validator`]
///
/// # Examples
///
/// ```
/// use jwtcheck::Validator;
/// use std::time::Duration;
///
/// let validator = Validator::builder()
///     .leeway(Duration::from_secs(30))
///     .issued_at()
///     .audiences(["api", "admin"])
///     .all_audiences()
///     .issuer("https://auth.example.com")
///     .subject("user123")
///     .build();
/// # let _ = validator;
/// ```
#[derive(Clone, Default)]
pub struct ValidatorBuilder {
    leeway: Duration,
    time_source: Option<TimeSource>,
    verify_issued_at: bool,
    expected_audiences: Vec<String>,
    all_audiences: bool,
    expected_issuer: Option<String>,
    expected_subject: Option<SubjectMatcher>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerance applied to `exp`, `nbf` and `iat` comparisons
    ///
    /// Leeway always widens the validity window: it is added to `exp` and
    /// subtracted from `nbf` and `iat`.
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Override the source of the current time
    ///
    /// Defaults to [`SystemTime::now`]. The function must be safe to call from
    /// any thread that uses the validator.
    pub fn time_source<F>(mut self, now: F) -> Self
    where
        F: Fn() -> SystemTime + Send + Sync + 'static,
    {
        self.time_source = Some(Arc::new(now));
        self
    }

    /// Reject tokens whose `iat` lies in the future
    pub fn issued_at(mut self) -> Self {
        self.verify_issued_at = true;
        self
    }

    /// Require `value` in the `aud` claim
    ///
    /// May be called repeatedly; by default any one expected audience is
    /// enough, see [`all_audiences`](Self::all_audiences).
    pub fn audience(mut self, value: impl Into<String>) -> Self {
        self.expected_audiences.push(value.into());
        self
    }

    /// Require audiences from `values` in the `aud` claim
    pub fn audiences<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_audiences
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Require every expected audience to be present, not just one
    pub fn all_audiences(mut self) -> Self {
        self.all_audiences = true;
        self
    }

    /// Require the `iss` claim to equal `value`
    pub fn issuer(mut self, value: impl Into<String>) -> Self {
        self.expected_issuer = Some(value.into());
        self
    }

    /// Require the `sub` claim to equal `value`
    pub fn subject(mut self, value: impl Into<String>) -> Self {
        self.expected_subject = Some(SubjectMatcher::Exact(value.into()));
        self
    }

    /// Require the `sub` claim to match `pattern`
    pub fn subject_pattern(mut self, pattern: Regex) -> Self {
        self.expected_subject = Some(SubjectMatcher::Pattern(pattern));
        self
    }

    /// Require the `sub` claim to satisfy `matcher`
    pub fn subject_matcher(mut self, matcher: impl Into<SubjectMatcher>) -> Self {
        self.expected_subject = Some(matcher.into());
        self
    }

    /// Finish configuration
    pub fn build(self) -> Validator {
        Validator {
            leeway: self.leeway,
            time_source: self.time_source,
            verify_issued_at: self.verify_issued_at,
            expected_audiences: self.expected_audiences,
            all_audiences: self.all_audiences,
            expected_issuer: self.expected_issuer,
            expected_subject: self.expected_subject,
        }
    }
}
