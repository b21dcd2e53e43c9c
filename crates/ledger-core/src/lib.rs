pub mod account;
pub mod error;
pub mod ledger;
pub mod snapshot;

pub use account::{Account, AccountId, HistoryEntry};
pub use error::{LedgerError, Result};
pub use ledger::{AccountView, Ledger, LoadOutcome};
pub use snapshot::Snapshot;
