use serde::{Deserialize, Serialize};
use std::fmt;

/// A client's display name as exported by the CPA spreadsheet.
///
/// Some clients have a `/` in their account name ("Smith/Jones Trust"),
/// which Windows reads as a path separator, so filenames use
/// [`ClientName::file_safe`] instead of the raw name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientName(String);

impl ClientName {
    pub fn new(raw: impl Into<String>) -> Self {
        ClientName(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with path separators replaced by underscores.
    pub fn file_safe(&self) -> String {
        self.0.replace('/', "_")
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_safe_replaces_slashes() {
        let name = ClientName::new("Smith/Jones Trust");
        assert_eq!(name.file_safe(), "Smith_Jones Trust");
        // Raw form is untouched for display.
        assert_eq!(name.as_str(), "Smith/Jones Trust");
    }

    #[test]
    fn file_safe_is_identity_without_slashes() {
        assert_eq!(ClientName::new("Jane Smith").file_safe(), "Jane Smith");
    }
}
