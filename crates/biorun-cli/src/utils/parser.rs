use biorun_core::engine::config::BenchmarkSetting;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Invalid benchmark setting '{0}'. Expected 'sequences@temperature' (e.g., '5@0.1')."
    )]
    InvalidSettingFormat(String),

    #[error("Invalid number of sequences in '{0}'. Expected a positive integer.")]
    InvalidSequenceCount(String),

    #[error("Invalid temperature in '{0}'. Expected a positive number.")]
    InvalidTemperature(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Parses a benchmark setting written as `sequences@temperature`.
pub fn parse_setting(s: &str) -> Result<BenchmarkSetting, ParseError> {
    let (count, temperature) = s
        .trim()
        .split_once('@')
        .ok_or_else(|| ParseError::InvalidSettingFormat(s.to_string()))?;

    let num_sequences: u32 = count
        .trim()
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ParseError::InvalidSequenceCount(s.to_string()))?;
    let temperature: f64 = temperature
        .trim()
        .parse()
        .ok()
        .filter(|t: &f64| t.is_finite() && *t > 0.0)
        .ok_or_else(|| ParseError::InvalidTemperature(s.to_string()))?;

    Ok(BenchmarkSetting {
        num_sequences,
        temperature,
    })
}

/// Splits `KEY=VALUE` at the first `=`. The key is trimmed; the value is kept as given.
pub fn parse_key_value(s: &str) -> Result<(&str, &str), ParseError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(ParseError::InvalidKeyValue(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_settings() {
        assert_eq!(
            parse_setting("5@0.1").unwrap(),
            BenchmarkSetting {
                num_sequences: 5,
                temperature: 0.1
            }
        );
        assert_eq!(parse_setting(" 3 @ 0.05 ").unwrap().num_sequences, 3);
    }

    #[test]
    fn rejects_malformed_settings() {
        assert_eq!(
            parse_setting("5"),
            Err(ParseError::InvalidSettingFormat("5".to_string()))
        );
        assert_eq!(
            parse_setting("0@0.1"),
            Err(ParseError::InvalidSequenceCount("0@0.1".to_string()))
        );
        assert_eq!(
            parse_setting("x@0.1"),
            Err(ParseError::InvalidSequenceCount("x@0.1".to_string()))
        );
        assert_eq!(
            parse_setting("5@-1"),
            Err(ParseError::InvalidTemperature("5@-1".to_string()))
        );
        assert_eq!(
            parse_setting("5@hot"),
            Err(ParseError::InvalidTemperature("5@hot".to_string()))
        );
    }

    #[test]
    fn key_value_splits_at_first_equals() {
        assert_eq!(
            parse_key_value("foldseek.format=query,target").unwrap(),
            ("foldseek.format", "query,target")
        );
        assert_eq!(parse_key_value("a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(parse_key_value("proteinmpnn.omit-aa=").unwrap(), ("proteinmpnn.omit-aa", ""));
    }

    #[test]
    fn key_value_requires_a_key_and_separator() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }
}
