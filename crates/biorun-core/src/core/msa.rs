//! Resolution of ColabFold's paired `--max-msa` setting.
//!
//! ColabFold takes the MSA depth as a single `max_seq:max_extra_seq` value. Users may give
//! either half, both halves, or the legacy combined string; the missing half is derived with
//! a fixed 1:2 ratio.

use std::fmt;
use thiserror::Error;

/// Sentinel accepted for the legacy combined value meaning "let the tool decide".
pub const AUTO: &str = "auto";

const SEPARATOR: char = ':';

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MsaError {
    #[error("Invalid max-msa value '{0}'. Expected an integer or 'max_seq:max_extra_seq'.")]
    InvalidLegacyValue(String),
}

/// The resolved `--max-msa` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxMsa {
    /// A numeric `(max_seq, max_extra_seq)` pair, wide enough to double any `u32` input.
    Pair { max_seq: u64, max_extra_seq: u64 },
    /// A legacy combined value that already contained a separator; passed through untouched.
    Verbatim(String),
}

impl MaxMsa {
    pub fn pair(&self) -> Option<(u64, u64)> {
        match self {
            MaxMsa::Pair {
                max_seq,
                max_extra_seq,
            } => Some((*max_seq, *max_extra_seq)),
            MaxMsa::Verbatim(_) => None,
        }
    }
}

impl fmt::Display for MaxMsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxMsa::Pair {
                max_seq,
                max_extra_seq,
            } => write!(f, "{}{}{}", max_seq, SEPARATOR, max_extra_seq),
            MaxMsa::Verbatim(value) => f.write_str(value),
        }
    }
}

/// Derives the `--max-msa` value.
///
/// Precedence: explicit pair, then a single half (the other derived), then the legacy combined
/// value. Returns `Ok(None)` when nothing was requested so the option is omitted entirely.
///
/// `max_extra_seq` alone yields `max_seq = max_extra_seq / 2` with truncating division, which
/// is intentionally not the exact inverse of the `* 2` rule.
pub fn derive_max_msa(
    max_seq: Option<u32>,
    max_extra_seq: Option<u32>,
    legacy: Option<&str>,
) -> Result<Option<MaxMsa>, MsaError> {
    let resolved = match (max_seq, max_extra_seq) {
        (Some(max_seq), Some(max_extra_seq)) => Some(MaxMsa::Pair {
            max_seq: max_seq.into(),
            max_extra_seq: max_extra_seq.into(),
        }),
        (Some(max_seq), None) => Some(doubled(max_seq)),
        (None, Some(max_extra_seq)) => Some(MaxMsa::Pair {
            max_seq: u64::from(max_extra_seq / 2),
            max_extra_seq: max_extra_seq.into(),
        }),
        (None, None) => match legacy.map(str::trim) {
            None => None,
            Some(value) if value.is_empty() || value == AUTO => None,
            Some(value) if value.contains(SEPARATOR) => Some(MaxMsa::Verbatim(value.to_string())),
            Some(value) => {
                let max_seq: u32 = value
                    .parse()
                    .map_err(|_| MsaError::InvalidLegacyValue(value.to_string()))?;
                Some(doubled(max_seq))
            }
        },
    };
    Ok(resolved)
}

fn doubled(max_seq: u32) -> MaxMsa {
    let max_seq = u64::from(max_seq);
    MaxMsa::Pair {
        max_seq,
        max_extra_seq: max_seq * 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(max_seq: Option<u32>, max_extra_seq: Option<u32>) -> Option<(u64, u64)> {
        derive_max_msa(max_seq, max_extra_seq, None)
            .unwrap()
            .and_then(|m| m.pair())
    }

    #[test]
    fn both_values_pass_through_unchanged() {
        assert_eq!(pair(Some(64), Some(512)), Some((64, 512)));
    }

    #[test]
    fn max_seq_alone_doubles_for_extra() {
        assert_eq!(pair(Some(100), None), Some((100, 200)));
    }

    #[test]
    fn doubling_does_not_clamp_large_values() {
        assert_eq!(pair(Some(3_000_000_000), None), Some((3_000_000_000, 6_000_000_000)));
        assert_eq!(
            pair(Some(u32::MAX), None),
            Some((u64::from(u32::MAX), 2 * u64::from(u32::MAX)))
        );

        let msa = derive_max_msa(None, None, Some("3000000000")).unwrap().unwrap();
        assert_eq!(msa.to_string(), "3000000000:6000000000");
    }

    #[test]
    fn max_extra_seq_alone_halves_with_truncation() {
        assert_eq!(pair(None, Some(201)), Some((100, 201)));
        assert_eq!(pair(None, Some(200)), Some((100, 200)));
        assert_eq!(pair(None, Some(1)), Some((0, 1)));
    }

    #[test]
    fn explicit_values_take_precedence_over_legacy() {
        let msa = derive_max_msa(Some(32), None, Some("16:64")).unwrap().unwrap();
        assert_eq!(msa.to_string(), "32:64");

        let msa = derive_max_msa(None, Some(101), Some("16:64")).unwrap().unwrap();
        assert_eq!(msa.to_string(), "50:101");
    }

    #[test]
    fn legacy_single_number_is_treated_as_max_seq() {
        let msa = derive_max_msa(None, None, Some("256")).unwrap().unwrap();
        assert_eq!(msa.pair(), Some((256, 512)));
        assert_eq!(msa.to_string(), "256:512");
    }

    #[test]
    fn legacy_pair_is_passed_verbatim() {
        let msa = derive_max_msa(None, None, Some("512:5120")).unwrap().unwrap();
        assert_eq!(msa, MaxMsa::Verbatim("512:5120".to_string()));
        assert_eq!(msa.to_string(), "512:5120");
    }

    #[test]
    fn nothing_requested_omits_the_option() {
        assert_eq!(derive_max_msa(None, None, None).unwrap(), None);
        assert_eq!(derive_max_msa(None, None, Some("auto")).unwrap(), None);
    }

    #[test]
    fn legacy_garbage_is_rejected() {
        assert_eq!(
            derive_max_msa(None, None, Some("lots")),
            Err(MsaError::InvalidLegacyValue("lots".to_string()))
        );
    }
}
