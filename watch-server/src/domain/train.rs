//! Train identifier type.

use std::fmt;

/// Maximum accepted length for a train identifier, after trimming.
const MAX_LEN: usize = 20;

/// Error returned when parsing an invalid train identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train identifier: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// A train identifier as entered by the user, e.g. `IC 538` or `538`.
///
/// The identifier is kept in its display form (trimmed, original casing)
/// and compacted on demand into the carrier-qualified form the iRail API
/// expects (`BE.NMBS.IC538`). Guaranteed non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrainId(String);

impl TrainId {
    /// Parse a train identifier from user input.
    ///
    /// Surrounding whitespace is trimmed. The result must be non-empty,
    /// at most 20 characters, and contain only letters, digits, spaces,
    /// dots and dashes.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidTrainId {
                reason: "must not be empty",
            });
        }

        if trimmed.len() > MAX_LEN {
            return Err(InvalidTrainId {
                reason: "too long",
            });
        }

        for c in trimmed.chars() {
            if !(c.is_ascii_alphanumeric() || c == ' ' || c == '.' || c == '-') {
                return Err(InvalidTrainId {
                    reason: "must contain only letters, digits, spaces, dots and dashes",
                });
            }
        }

        Ok(TrainId(trimmed.to_string()))
    }

    /// Returns the identifier as entered (trimmed).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the carrier-qualified identifier for API calls.
    ///
    /// Internal whitespace is removed and letters uppercased, so both
    /// `IC 538` and `ic538` qualify to `BE.NMBS.IC538`.
    pub fn qualified(&self) -> String {
        let compact: String = self
            .0
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        format!("BE.NMBS.{compact}")
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert!(TrainId::parse("IC 538").is_ok());
        assert!(TrainId::parse("538").is_ok());
        assert!(TrainId::parse("S2 1234").is_ok());
        assert!(TrainId::parse("  P8008  ").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(TrainId::parse("").is_err());
        assert!(TrainId::parse("   ").is_err());
    }

    #[test]
    fn reject_too_long() {
        assert!(TrainId::parse("IC 5380000000000000000000").is_err());
    }

    #[test]
    fn reject_bad_characters() {
        assert!(TrainId::parse("IC/538").is_err());
        assert!(TrainId::parse("IC_538").is_err());
        assert!(TrainId::parse("IC%20538").is_err());
    }

    #[test]
    fn trims_display_form() {
        let id = TrainId::parse("  IC 538 ").unwrap();
        assert_eq!(id.as_str(), "IC 538");
        assert_eq!(id.to_string(), "IC 538");
    }

    #[test]
    fn qualified_compacts_and_uppercases() {
        let id = TrainId::parse("ic 538").unwrap();
        assert_eq!(id.qualified(), "BE.NMBS.IC538");

        let id = TrainId::parse("538").unwrap();
        assert_eq!(id.qualified(), "BE.NMBS.538");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for plausible train identifiers.
    fn valid_train_string() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Za-z]{0,3} ?[0-9]{1,5}").unwrap()
    }

    proptest! {
        /// Any plausible identifier parses and round-trips its trimmed form.
        #[test]
        fn roundtrip(s in valid_train_string()) {
            let id = TrainId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.trim());
        }

        /// The qualified form never contains whitespace.
        #[test]
        fn qualified_has_no_whitespace(s in valid_train_string()) {
            let id = TrainId::parse(&s).unwrap();
            prop_assert!(!id.qualified().chars().any(char::is_whitespace));
        }
    }
}
