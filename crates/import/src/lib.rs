pub mod cc;
pub mod roster;
pub mod schema;
pub(crate) mod util;

pub use cc::{group_households, load_cc_rows, CcError, CcHousehold, CcRow};
pub use roster::{AccountRecord, ClientRoster, HouseholdIndex, RosterError, DEFAULT_CUSTODIAN};
pub use schema::{RosterSchema, SchemaError};
