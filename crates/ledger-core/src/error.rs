use crate::account::AccountId;
use rust_decimal::Decimal;

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

/// Every way a ledger operation can be refused.
///
/// A failed operation leaves the ledger exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount ₹{amount}")]
    InvalidAmount { amount: Decimal },

    #[error("insufficient funds in A/C {account}: balance ₹{balance}, requested ₹{requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Decimal,
        requested: Decimal,
    },

    #[error("A/C {account} cannot hold ₹{balance} + ₹{amount}")]
    BalanceOverflow {
        account: AccountId,
        balance: Decimal,
        amount: Decimal,
    },

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("account number {0} already exists")]
    DuplicateAccount(AccountId),

    #[error("cannot transfer from A/C {0} to itself")]
    SameAccountTransfer(AccountId),

    #[error("corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json reports reader failures as errors too
        if err.is_io() {
            return Self::Io(err.into());
        }

        Self::CorruptSnapshot {
            reason: err.to_string(),
        }
    }
}
