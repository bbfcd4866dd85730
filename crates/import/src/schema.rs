use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse schema TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("header row matches no known roster layout")]
    UnknownLayout,
}

/// Maps the loader's logical fields onto one CPA export's column headers.
///
/// The office's CRM has produced two CSV layouts over the years; both are
/// built in. A custom layout can be loaded from TOML when the export
/// changes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSchema {
    pub name: String,
    /// Tax-info recipient name columns, in report order.
    pub recipient_columns: Vec<String>,
    pub client_column: String,
    pub account_column: String,
    pub custodian_column: String,
    pub household_column: String,
}

impl RosterSchema {
    /// The layout with `Household:`/`Financial Account:` qualified headers.
    pub fn qualified() -> Self {
        RosterSchema {
            name: "qualified".to_string(),
            recipient_columns: vec![
                "Tax Info Recipient 1".to_string(),
                "Tax Info Recipient 2".to_string(),
            ],
            client_column: "Household: Account Name".to_string(),
            account_column: "Financial Account: Financial Account Name".to_string(),
            custodian_column: "Custodian".to_string(),
            household_column: "Household: Source System ID".to_string(),
        }
    }

    /// The layout with flat headers and `: Full Name` recipient columns.
    pub fn flat() -> Self {
        RosterSchema {
            name: "flat".to_string(),
            recipient_columns: vec![
                "Tax Info Recipient 1: Full Name".to_string(),
                "Tax Info Recipient 2: Full Name".to_string(),
            ],
            client_column: "Account Name".to_string(),
            account_column: "Financial Account Name".to_string(),
            custodian_column: "Custodian: Custodian Name".to_string(),
            household_column: "Source System ID".to_string(),
        }
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::qualified(), Self::flat()]
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Pick the built-in layout whose columns are all present in `headers`.
    pub fn detect(headers: &[String]) -> Result<Self, SchemaError> {
        Self::builtin()
            .into_iter()
            .find(|schema| schema.missing_columns(headers).is_empty())
            .ok_or(SchemaError::UnknownLayout)
    }

    /// Required columns absent from `headers`, in schema order.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        self.required_columns()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect()
    }

    fn required_columns(&self) -> impl Iterator<Item = &String> {
        self.recipient_columns.iter().chain([
            &self.client_column,
            &self.account_column,
            &self.custodian_column,
            &self.household_column,
        ])
    }
}
