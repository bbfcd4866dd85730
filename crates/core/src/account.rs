use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading characters masked in output filenames.
const REDACTED_PREFIX_LEN: usize = 4;

/// A custodian account number as it appears in the roster export:
/// 8 digits, stored without the dash that input filenames carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Build from a raw filename token such as `"1234-5678"`. Dashes are
    /// stripped; anything else is kept verbatim. Tokens that are not 8
    /// digits still go through — the roster lookup decides their fate.
    pub fn from_token(token: &str) -> Self {
        AccountNumber(token.replace('-', ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the number has the expected custodian shape (8 ASCII digits).
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 8 && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Masked form for output filenames: the first four characters become
    /// `X`, the remainder is kept. A short token still yields four `X`s.
    pub fn redacted(&self) -> String {
        let tail: String = self.0.chars().skip(REDACTED_PREFIX_LEN).collect();
        format!("{}{}", "X".repeat(REDACTED_PREFIX_LEN), tail)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_strips_dashes() {
        assert_eq!(AccountNumber::from_token("1234-5678").as_str(), "12345678");
        assert_eq!(AccountNumber::from_token("12345678").as_str(), "12345678");
    }

    #[test]
    fn redacted_masks_first_four() {
        let acct = AccountNumber::from_token("1234-5678");
        assert_eq!(acct.redacted(), "XXXX5678");
    }

    #[test]
    fn redacted_keeps_everything_past_four() {
        // No length validation: longer tokens keep their full tail.
        let acct = AccountNumber::from_token("123456789");
        assert_eq!(acct.redacted(), "XXXX56789");
    }

    #[test]
    fn redacted_short_token_is_all_xs() {
        let acct = AccountNumber::from_token("12-3");
        assert_eq!(acct.redacted(), "XXXX");
    }

    #[test]
    fn well_formed_requires_eight_digits() {
        assert!(AccountNumber::from_token("1234-5678").is_well_formed());
        assert!(!AccountNumber::from_token("1234-567").is_well_formed());
        assert!(!AccountNumber::from_token("1234567a").is_well_formed());
    }
}
