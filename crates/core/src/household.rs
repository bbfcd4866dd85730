use serde::{Deserialize, Serialize};
use std::fmt;

/// The numeric household identifier shared by the roster export and the
/// office's folder naming convention.
///
/// The export carries it as a source system ID of the form
/// `"<prefix>-...-<household_number>"` (e.g. `"Household-0099-4521"`); the
/// household number is the segment after the last `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseholdId(String);

impl HouseholdId {
    pub fn new(number: impl Into<String>) -> Self {
        HouseholdId(number.into())
    }

    /// Extract the household number from a full source system ID.
    pub fn from_source_id(source_id: &str) -> Self {
        let number = source_id.rsplit('-').next().unwrap_or(source_id);
        HouseholdId(number.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
