use std::collections::HashMap;
use std::path::Path;

use taxsort_core::{AccountNumber, ClientName, HouseholdId};
use thiserror::Error;

use crate::schema::{RosterSchema, SchemaError};
use crate::util::read_file_as_utf8;

/// The one custodian whose documents this office processes.
pub const DEFAULT_CUSTODIAN: &str = "Charles Schwab & Co.";

/// Placeholder the export convention uses for absent values.
const MISSING_VALUE: &str = "None";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("roster is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("no roster rows for custodian '{0}'")]
    NoCustodianRows(String),
}

/// One row of the CPA roster, restricted to the fields this tool uses.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: AccountNumber,
    pub client: ClientName,
    pub household: HouseholdId,
    pub custodian: String,
    /// Tax-info recipient names, already whitespace-trimmed.
    pub recipients: Vec<String>,
}

/// The custodian-filtered roster with a first-match account index.
///
/// Account numbers are expected to be unique per custodian; when the export
/// repeats one, the first row in file order is authoritative and the
/// duplicate is logged.
pub struct ClientRoster {
    records: Vec<AccountRecord>,
    by_account: HashMap<String, usize>,
}

impl ClientRoster {
    /// Load the roster CSV at `path`, decoding cp1252 exports as needed.
    /// With no explicit `schema`, the header row picks a built-in layout.
    pub fn load(
        path: &Path,
        schema: Option<RosterSchema>,
        custodian: &str,
    ) -> Result<Self, RosterError> {
        let content = read_file_as_utf8(path)?;
        Self::from_csv_text(&content, schema, custodian)
    }

    pub fn from_csv_text(
        content: &str,
        schema: Option<RosterSchema>,
        custodian: &str,
    ) -> Result<Self, RosterError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let schema = match schema {
            Some(schema) => {
                let missing = schema.missing_columns(&headers);
                if !missing.is_empty() {
                    return Err(RosterError::MissingColumns(missing));
                }
                schema
            }
            None => RosterSchema::detect(&headers)?,
        };

        let column = |name: &str| -> usize {
            // Presence was just verified against the header row.
            headers.iter().position(|h| h == name).expect("known column")
        };
        let client_col = column(&schema.client_column);
        let account_col = column(&schema.account_column);
        let custodian_col = column(&schema.custodian_column);
        let household_col = column(&schema.household_column);
        let recipient_cols: Vec<usize> = schema
            .recipient_columns
            .iter()
            .map(|c| column(c))
            .collect();

        let mut records = Vec::new();
        let mut by_account: HashMap<String, usize> = HashMap::new();

        for row in reader.records() {
            let row = row?;
            let field = |idx: usize| -> String {
                let value = row.get(idx).unwrap_or_default().trim();
                if value.is_empty() {
                    MISSING_VALUE.to_string()
                } else {
                    value.to_string()
                }
            };

            if field(custodian_col) != custodian {
                continue;
            }

            let record = AccountRecord {
                account: AccountNumber::from_token(&field(account_col)),
                client: ClientName::new(field(client_col)),
                household: HouseholdId::from_source_id(&field(household_col)),
                custodian: field(custodian_col),
                recipients: recipient_cols.iter().map(|&idx| field(idx)).collect(),
            };

            let index = records.len();
            if let Some(&first) = by_account.get(record.account.as_str()) {
                let first: &AccountRecord = &records[first];
                tracing::warn!(
                    account = %record.account,
                    kept = %first.client,
                    dropped = %record.client,
                    "duplicate account number in roster; keeping first row"
                );
            } else {
                by_account.insert(record.account.as_str().to_string(), index);
            }
            records.push(record);
        }

        if records.is_empty() {
            return Err(RosterError::NoCustodianRows(custodian.to_string()));
        }

        Ok(ClientRoster { records, by_account })
    }

    /// The authoritative row for an account number, if any.
    pub fn find(&self, account: &AccountNumber) -> Option<&AccountRecord> {
        self.by_account
            .get(account.as_str())
            .map(|&idx| &self.records[idx])
    }

    pub fn records(&self) -> &[AccountRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Immutable account-number → household-number mapping, built once per run.
pub struct HouseholdIndex(HashMap<String, HouseholdId>);

impl HouseholdIndex {
    pub fn build(roster: &ClientRoster) -> Self {
        let mut map = HashMap::new();
        for record in roster.records() {
            // First row wins, matching the roster's account index.
            map.entry(record.account.as_str().to_string())
                .or_insert_with(|| record.household.clone());
        }
        HouseholdIndex(map)
    }

    pub fn get(&self, account: &AccountNumber) -> Option<&HouseholdId> {
        self.0.get(account.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUALIFIED_CSV: &str = "\
Tax Info Recipient 1,Tax Info Recipient 2,Household: Account Name,Financial Account: Financial Account Name,Custodian,Household: Source System ID
Jane Smith , ,Jane Smith,12345678,Charles Schwab & Co.,Household-0099-4521
Bob Jones,Ann Jones,Jones Family Trust,87654321,Charles Schwab & Co.,Household-0100-77
Carl Owens,,Carl Owens,55555555,Fidelity,Household-0101-900
";

    const FLAT_CSV: &str = "\
Tax Info Recipient 1: Full Name,Tax Info Recipient 2: Full Name,Account Name,Financial Account Name,Custodian: Custodian Name,Source System ID
Jane Smith,,Jane Smith,12345678,Charles Schwab & Co.,Household-0099-4521
";

    #[test]
    fn load_filters_to_custodian() {
        let roster =
            ClientRoster::from_csv_text(QUALIFIED_CSV, None, DEFAULT_CUSTODIAN).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster
            .records()
            .iter()
            .all(|r| r.custodian == DEFAULT_CUSTODIAN));
    }

    #[test]
    fn both_layouts_are_detected() {
        let qualified =
            ClientRoster::from_csv_text(QUALIFIED_CSV, None, DEFAULT_CUSTODIAN).unwrap();
        let flat = ClientRoster::from_csv_text(FLAT_CSV, None, DEFAULT_CUSTODIAN).unwrap();

        let acct = AccountNumber::from_token("12345678");
        assert_eq!(qualified.find(&acct).unwrap().client.as_str(), "Jane Smith");
        assert_eq!(flat.find(&acct).unwrap().client.as_str(), "Jane Smith");
    }

    #[test]
    fn household_number_is_source_id_suffix() {
        let roster =
            ClientRoster::from_csv_text(QUALIFIED_CSV, None, DEFAULT_CUSTODIAN).unwrap();
        let record = roster.find(&AccountNumber::from_token("12345678")).unwrap();
        assert_eq!(record.household.as_str(), "4521");
    }

    #[test]
    fn recipients_are_trimmed_and_missing_becomes_none() {
        let roster =
            ClientRoster::from_csv_text(QUALIFIED_CSV, None, DEFAULT_CUSTODIAN).unwrap();
        let record = roster.find(&AccountNumber::from_token("12345678")).unwrap();
        assert_eq!(record.recipients, vec!["Jane Smith", "None"]);
    }

    #[test]
    fn explicit_schema_with_missing_columns_errors() {
        let result = ClientRoster::from_csv_text(
            QUALIFIED_CSV,
            Some(RosterSchema::flat()),
            DEFAULT_CUSTODIAN,
        );
        assert!(matches!(result, Err(RosterError::MissingColumns(_))));
    }

    #[test]
    fn unknown_headers_error() {
        let result = ClientRoster::from_csv_text("a,b\n1,2\n", None, DEFAULT_CUSTODIAN);
        assert!(matches!(
            result,
            Err(RosterError::Schema(SchemaError::UnknownLayout))
        ));
    }

    #[test]
    fn empty_after_filter_errors() {
        let result = ClientRoster::from_csv_text(QUALIFIED_CSV, None, "Vanguard");
        assert!(matches!(result, Err(RosterError::NoCustodianRows(_))));
    }

    #[test]
    fn duplicate_account_keeps_first_row() {
        let csv = "\
Tax Info Recipient 1,Tax Info Recipient 2,Household: Account Name,Financial Account: Financial Account Name,Custodian,Household: Source System ID
First Match,,First Match,12345678,Charles Schwab & Co.,H-1-100
Second Match,,Second Match,12345678,Charles Schwab & Co.,H-1-200
";
        let roster = ClientRoster::from_csv_text(csv, None, DEFAULT_CUSTODIAN).unwrap();
        let record = roster.find(&AccountNumber::from_token("12345678")).unwrap();
        assert_eq!(record.client.as_str(), "First Match");

        let index = HouseholdIndex::build(&roster);
        let hh = index.get(&AccountNumber::from_token("12345678")).unwrap();
        assert_eq!(hh.as_str(), "100");
    }

    #[test]
    fn household_index_covers_all_accounts() {
        let roster =
            ClientRoster::from_csv_text(QUALIFIED_CSV, None, DEFAULT_CUSTODIAN).unwrap();
        let index = HouseholdIndex::build(&roster);
        assert_eq!(index.len(), 2);
        assert!(index
            .get(&AccountNumber::from_token("5555-5555"))
            .is_none());
    }
}
