pub mod account;
pub mod client;
pub mod household;
pub mod year;

pub use account::AccountNumber;
pub use client::ClientName;
pub use household::HouseholdId;
pub use year::{TaxYear, YearError};
