//! JSON numeric dates (RFC 7519 Section 2)
//!
//! A `NumericDate` is the number of seconds since the Unix epoch, optionally
//! with a fractional part. Each value carries the [`Precision`] it is written
//! with, so serialization never depends on process-wide settings.

use crate::utils::time::{NANOS_PER_SEC, unix_nanos};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Resolution used when writing a [`NumericDate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    /// Whole seconds (`1516239022`)
    #[default]
    Second,
    /// Three fractional digits (`1516239022.123`)
    Millisecond,
    /// Six fractional digits (`1516239022.123456`)
    Microsecond,
    /// Nine fractional digits (`1516239022.123456789`)
    ///
    /// JSON numbers decoded as `f64` keep about 16 significant digits, so
    /// present-day timestamps parsed from JSON are exact to roughly 100ns.
    /// Dates built with [`NumericDate::from_unix_parts`], or decoded with
    /// serde_json's `arbitrary_precision` feature, keep every digit.
    Nanosecond,
}

impl Precision {
    /// Number of fractional digits written for this precision
    pub fn digits(self) -> usize {
        match self {
            Precision::Second => 0,
            Precision::Millisecond => 3,
            Precision::Microsecond => 6,
            Precision::Nanosecond => 9,
        }
    }

    /// Drop the sub-second part below this precision
    pub fn truncate(self, nanos: u32) -> u32 {
        let unit = match self {
            Precision::Second => 1_000_000_000,
            Precision::Millisecond => 1_000_000,
            Precision::Microsecond => 1_000,
            Precision::Nanosecond => 1,
        };
        nanos - nanos % unit
    }

    /// Smallest precision able to hold `digits` fractional digits
    fn for_digits(digits: usize) -> Self {
        match digits {
            0 => Precision::Second,
            1..=3 => Precision::Millisecond,
            4..=6 => Precision::Microsecond,
            _ => Precision::Nanosecond,
        }
    }
}

/// A point in time, written as seconds since the Unix epoch
///
/// Equality, ordering and hashing compare the instant only; the precision is
/// a formatting property.
///
/// # Examples
///
/// ```
/// use jwtcheck::{NumericDate, Precision};
///
/// let date = NumericDate::from_unix_parts(1516239022, 123_456_789)
///     .with_precision(Precision::Microsecond);
/// assert_eq!(serde_json::to_string(&date).unwrap(), "1516239022.123456");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NumericDate {
    seconds: i64,
    nanos: u32,
    precision: Precision,
}

impl NumericDate {
    /// Create a date from a system time, written with whole-second precision
    pub fn new(time: SystemTime) -> Self {
        Self::from_unix_nanos(unix_nanos(time), Precision::default())
    }

    /// The current time
    pub fn now() -> Self {
        Self::new(SystemTime::now())
    }

    /// Create a date from whole seconds since the epoch
    pub fn from_unix(seconds: i64) -> Self {
        Self {
            seconds,
            nanos: 0,
            precision: Precision::Second,
        }
    }

    /// Create a date from seconds and a sub-second nanosecond offset
    ///
    /// Nanoseconds beyond one second carry into `seconds`.
    pub fn from_unix_parts(seconds: i64, nanos: u32) -> Self {
        let total = i128::from(seconds) * NANOS_PER_SEC + i128::from(nanos);
        Self::from_unix_nanos(total, Precision::default())
    }

    /// Create a date from fractional seconds since the epoch
    ///
    /// The value is split through its shortest decimal form, so
    /// `1516239022.123` yields exactly 123 milliseconds. The precision of the
    /// result is the smallest one that holds every fractional digit.
    /// Returns `None` for non-finite values and values outside the `i64`
    /// seconds range.
    ///
    /// An `f64` carries about 16 significant digits, so nanoseconds of a
    /// present-day timestamp are not preserved.
    pub fn from_seconds_f64(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() {
            return None;
        }
        Self::from_decimal(&seconds.to_string())
    }

    /// Parse a plain decimal such as `-1516239022.123`
    ///
    /// Digits past the ninth fractional place are dropped. Exponents are not
    /// accepted.
    fn from_decimal(text: &str) -> Option<Self> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let whole: i64 = whole.parse().ok()?;
        let mut nanos = 0u32;
        for (i, digit) in fraction.bytes().take(9).enumerate() {
            nanos += u32::from(digit - b'0') * 10u32.pow(8 - i as u32);
        }

        let mut total = i128::from(whole) * NANOS_PER_SEC + i128::from(nanos);
        if negative {
            total = -total;
        }
        if total.div_euclid(NANOS_PER_SEC) > i128::from(i64::MAX)
            || total.div_euclid(NANOS_PER_SEC) < i128::from(i64::MIN)
        {
            return None;
        }

        Some(Self::from_unix_nanos(
            total,
            Precision::for_digits(fraction.len()),
        ))
    }

    /// Use a different precision when writing this date
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Whole seconds since the epoch (floored)
    pub fn unix_seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanoseconds past `unix_seconds`, in `0..1_000_000_000`
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Precision used when writing this date
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// This date with everything below its precision removed
    pub fn truncated(&self) -> Self {
        Self {
            nanos: self.precision.truncate(self.nanos),
            ..*self
        }
    }

    /// Convert into a `SystemTime`, if the platform can represent it
    pub fn as_system_time(&self) -> Option<SystemTime> {
        let nanos = self.unix_nanos();
        let magnitude = nanos.unsigned_abs();
        let offset = Duration::new(
            u64::try_from(magnitude / NANOS_PER_SEC as u128).ok()?,
            (magnitude % NANOS_PER_SEC as u128) as u32,
        );
        if nanos >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }

    /// Signed nanoseconds since the epoch
    pub(crate) fn unix_nanos(&self) -> i128 {
        i128::from(self.seconds) * NANOS_PER_SEC + i128::from(self.nanos)
    }

    fn from_unix_nanos(total: i128, precision: Precision) -> Self {
        let seconds = total.div_euclid(NANOS_PER_SEC);
        Self {
            seconds: i64::try_from(seconds).unwrap_or(if seconds < 0 {
                i64::MIN
            } else {
                i64::MAX
            }),
            nanos: total.rem_euclid(NANOS_PER_SEC) as u32,
            precision,
        }
    }
}

impl From<SystemTime> for NumericDate {
    fn from(time: SystemTime) -> Self {
        Self::new(time)
    }
}

impl PartialEq for NumericDate {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds && self.nanos == other.nanos
    }
}

impl Eq for NumericDate {}

impl PartialOrd for NumericDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericDate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.seconds, self.nanos).cmp(&(other.seconds, other.nanos))
    }
}

impl Hash for NumericDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seconds.hash(state);
        self.nanos.hash(state);
    }
}

/// Writes the JSON number form, truncated to the date's precision
impl fmt::Display for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let truncated = self.truncated();
        let digits = self.precision.digits();
        if digits == 0 {
            return write!(f, "{}", truncated.seconds);
        }

        // Render the absolute value so that -1.5 is written as "-1.500", not "-2.500"
        let nanos = truncated.unix_nanos();
        let magnitude = nanos.unsigned_abs();
        let whole = magnitude / NANOS_PER_SEC as u128;
        let fraction = (magnitude % NANOS_PER_SEC as u128) / 10u128.pow(9 - digits as u32);
        let sign = if nanos < 0 { "-" } else { "" };
        write!(f, "{sign}{whole}.{fraction:0digits$}")
    }
}

impl Serialize for NumericDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.precision == Precision::Second {
            return serializer.serialize_i64(self.seconds);
        }
        let raw = serde_json::value::RawValue::from_string(self.to_string())
            .map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Map key serde_json uses to pass numbers when `arbitrary_precision` is on
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

struct NumericDateVisitor;

impl<'de> Visitor<'de> for NumericDateVisitor {
    type Value = NumericDate;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number of seconds since the Unix epoch")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<NumericDate, E> {
        Ok(NumericDate::from_unix(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<NumericDate, E> {
        i64::try_from(value)
            .map(NumericDate::from_unix)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<NumericDate, E> {
        NumericDate::from_seconds_f64(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Float(value), &self))
    }

    // Numbers arrive as `{TOKEN: "<digits>"}` under `arbitrary_precision`
    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<NumericDate, A::Error> {
        let number = match map.next_key::<String>()? {
            Some(key) if key == NUMBER_TOKEN => map.next_value::<String>()?,
            _ => return Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
        };

        NumericDate::from_decimal(&number)
            .or_else(|| {
                number
                    .parse::<f64>()
                    .ok()
                    .and_then(NumericDate::from_seconds_f64)
            })
            .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(&number), &self))
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericDateVisitor)
    }
}
