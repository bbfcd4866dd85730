use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YearError {
    #[error("filing year must be a 4-digit number, got '{0}'")]
    Invalid(String),
}

/// The filing year, matched against the trailing digits of the office's
/// per-client output folders ("Smith_4521_2023").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYear(pub u16);

impl TaxYear {
    pub fn new(year: u16) -> Self {
        TaxYear(year)
    }

    /// Parse user input. The folder convention requires exactly 4 digits.
    pub fn parse(s: &str) -> Result<Self, YearError> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(YearError::Invalid(s.to_string()));
        }
        // 4 ASCII digits always fit a u16.
        Ok(TaxYear(s.parse().expect("4-digit number")))
    }

    /// The current calendar year — the usual answer during filing season.
    pub fn current() -> Self {
        TaxYear(chrono::Local::now().year() as u16)
    }

    pub fn year(self) -> u16 {
        self.0
    }

    /// Whether a directory name marks this year's folder.
    pub fn matches_dir_name(self, name: &str) -> bool {
        name.ends_with(&self.0.to_string())
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_four_digits() {
        assert_eq!(TaxYear::parse("2023").unwrap(), TaxYear(2023));
        assert_eq!(TaxYear::parse(" 2023 ").unwrap(), TaxYear(2023));
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert!(TaxYear::parse("23").is_err());
        assert!(TaxYear::parse("20234").is_err());
        assert!(TaxYear::parse("two thousand").is_err());
        assert!(TaxYear::parse("").is_err());
    }

    #[test]
    fn matches_dir_name_on_suffix() {
        let year = TaxYear(2023);
        assert!(year.matches_dir_name("Smith_4521_2023"));
        assert!(year.matches_dir_name("2023"));
        assert!(!year.matches_dir_name("Smith_4521_2022"));
        assert!(!year.matches_dir_name("2023_archive"));
    }

    #[test]
    fn display_is_bare_digits() {
        assert_eq!(TaxYear(2023).to_string(), "2023");
    }
}
