use taxsort_core::{AccountNumber, ClientName};

/// An input filename split into its account token and everything after the
/// first underscore (extension included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub account: AccountNumber,
    pub rest: String,
}

/// Parse `"<account-with-dash>_<rest...>.pdf"`. A name without an
/// underscore still parses — the whole name becomes the account token and
/// the roster lookup rejects it downstream.
pub fn parse(file_name: &str) -> ParsedName {
    match file_name.split_once('_') {
        Some((token, rest)) => ParsedName {
            account: AccountNumber::from_token(token),
            rest: rest.to_string(),
        },
        None => ParsedName {
            account: AccountNumber::from_token(file_name),
            rest: String::new(),
        },
    }
}

/// The output filename: `"<client>_XXXX<last-4>_<rest>"`.
pub fn compose(client: &ClientName, account: &AccountNumber, rest: &str) -> String {
    format!("{}_{}_{}", client.file_safe(), account.redacted(), rest)
}
