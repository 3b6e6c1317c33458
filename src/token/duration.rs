//! Expiry duration specs
//!
//! Accepts either a bare number of milliseconds or a number followed by a
//! unit: `500`, `500ms`, `30s`, `15m`, `1h`, `1.5h`, `7d`, `2w`, `1y`.
//! Long unit names (`hours`, `days`, ...) are accepted, case-insensitively.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = SECOND_MS * 60.0;
const HOUR_MS: f64 = MINUTE_MS * 60.0;
const DAY_MS: f64 = HOUR_MS * 24.0;
const WEEK_MS: f64 = DAY_MS * 7.0;
const YEAR_MS: f64 = DAY_MS * 365.25;

/// Default token lifetime
pub const DEFAULT_EXPIRES_IN: &str = "1h";

/// An expiry as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExpirySpec {
    /// Bare integer, in milliseconds
    Millis(u64),
    /// Number with optional unit
    Text(String),
}

impl ExpirySpec {
    pub fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            ExpirySpec::Millis(0) => Err(ConfigError::InvalidDuration {
                value: "0".to_string(),
                reason: "expiry must be greater than zero".to_string(),
            }),
            ExpirySpec::Millis(ms) => Ok(Duration::from_millis(*ms)),
            ExpirySpec::Text(text) => parse_duration(text),
        }
    }
}

impl Default for ExpirySpec {
    fn default() -> Self {
        ExpirySpec::Text(DEFAULT_EXPIRES_IN.to_string())
    }
}

impl From<&str> for ExpirySpec {
    fn from(text: &str) -> Self {
        ExpirySpec::Text(text.to_string())
    }
}

impl From<u64> for ExpirySpec {
    fn from(ms: u64) -> Self {
        ExpirySpec::Millis(ms)
    }
}

impl fmt::Display for ExpirySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpirySpec::Millis(ms) => write!(f, "{ms}ms"),
            ExpirySpec::Text(text) => f.write_str(text),
        }
    }
}

/// Parse a duration such as `"1h"` or `"250"`
pub fn parse_duration(text: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        value: text.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    if number.is_empty() {
        return Err(invalid("expected a number"));
    }
    let value: f64 = number.parse().map_err(|_| invalid("expected a number"))?;

    let factor = unit_millis(&unit.trim().to_ascii_lowercase())
        .ok_or_else(|| invalid("unknown unit, expected one of ms, s, m, h, d, w, y"))?;

    let millis = value * factor;
    if millis <= 0.0 {
        return Err(invalid("expiry must be greater than zero"));
    }

    Duration::try_from_secs_f64(millis / SECOND_MS).map_err(|_| invalid("expiry is out of range"))
}

fn unit_millis(unit: &str) -> Option<f64> {
    let factor = match unit {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND_MS,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE_MS,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR_MS,
        "d" | "day" | "days" => DAY_MS,
        "w" | "week" | "weeks" => WEEK_MS,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR_MS,
        _ => return None,
    };
    Some(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Duration::from_millis(1))]
    #[case("250ms", Duration::from_millis(250))]
    #[case("30s", Duration::from_secs(30))]
    #[case("15m", Duration::from_secs(15 * 60))]
    #[case("1h", Duration::from_secs(3600))]
    #[case("1.5h", Duration::from_secs(5400))]
    #[case("2 days", Duration::from_secs(2 * 86_400))]
    #[case("1w", Duration::from_secs(7 * 86_400))]
    #[case("1y", Duration::from_secs(31_557_600))]
    #[case(" 10 Minutes ", Duration::from_secs(600))]
    fn test_parse_duration(#[case] text: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(text).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("h")]
    #[case("1 fortnight")]
    #[case("-1h")]
    #[case("0s")]
    #[case("1..5h")]
    fn test_parse_duration_rejects(#[case] text: &str) {
        assert!(matches!(
            parse_duration(text),
            Err(ConfigError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_expiry_spec_millis() {
        assert_eq!(
            ExpirySpec::Millis(1500).to_duration().unwrap(),
            Duration::from_millis(1500)
        );
        assert!(ExpirySpec::Millis(0).to_duration().is_err());
    }

    #[test]
    fn test_expiry_spec_deserialize() {
        let text: ExpirySpec = serde_json::from_str("60000").unwrap();
        assert_eq!(text, ExpirySpec::Millis(60_000));

        let text: ExpirySpec = serde_json::from_str(r#""2h""#).unwrap();
        assert_eq!(text.to_duration().unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn test_default_is_one_hour() {
        assert_eq!(
            ExpirySpec::default().to_duration().unwrap(),
            Duration::from_secs(3600)
        );
    }
}
