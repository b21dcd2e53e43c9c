//! On-disk form of a ledger: a JSON object keyed by account number.
//!
//! ```json
//! {
//!   "1001": {
//!     "holder_name": "Asha",
//!     "balance": 400.0,
//!     "history": [["2024-03-05 14:07:09", "Deposited ₹200"]]
//!   }
//! }
//! ```

use crate::account::{Account, AccountId, HistoryEntry};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Persisted state of one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(alias = "name")]
    pub holder_name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    #[serde(default, alias = "transactions")]
    pub history: Vec<HistoryEntry>,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            holder_name: account.holder_name().to_owned(),
            balance: account.balance(),
            history: account.history().to_vec(),
        }
    }
}

/// Full-state dump of every account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub accounts: BTreeMap<AccountId, AccountRecord>,
}

impl Snapshot {
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.id().clone(), AccountRecord::from(account)))
                .collect(),
        }
    }

    /// Parses and validates a snapshot. Anything that does not describe a
    /// valid set of accounts is reported as `CorruptSnapshot`.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let snapshot: Self = serde_json::from_reader(reader)?;

        for (id, record) in &snapshot.accounts {
            if record.balance < Decimal::ZERO {
                return Err(LedgerError::CorruptSnapshot {
                    reason: format!("A/C {id} has negative balance {}", record.balance),
                });
            }
        }

        Ok(snapshot)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }

    pub fn into_accounts(self) -> impl Iterator<Item = Account> {
        self.accounts.into_iter().map(|(id, record)| {
            Account::restore(id, record.holder_name, record.balance, record.history)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reads_documented_format() {
        let json = r#"{
            "1001": {
                "holder_name": "Asha",
                "balance": 400.5,
                "history": [
                    ["2024-03-05 14:07:09", "Deposited ₹200"],
                    ["2024-03-05 14:08:00", "Transferred ₹300 to A/C 1002"]
                ]
            },
            "1002": { "holder_name": "Ravi", "balance": 0, "history": [] }
        }"#;

        let snapshot = Snapshot::read_from(json.as_bytes()).unwrap();

        let asha = &snapshot.accounts[&AccountId::from("1001")];
        assert_eq!(asha.holder_name, "Asha");
        assert_eq!(asha.balance, dec!(400.5));
        assert_eq!(asha.history.len(), 2);
        assert_eq!(asha.history[1].description, "Transferred ₹300 to A/C 1002");

        let ravi = &snapshot.accounts[&AccountId::from("1002")];
        assert_eq!(ravi.balance, Decimal::ZERO);
        assert!(ravi.history.is_empty());
    }

    #[test]
    fn test_reads_legacy_field_names() {
        let json = r#"{"7": {"name": "Mei", "balance": 12.0,
            "transactions": [["2023-12-31 23:59:59", "Deposited ₹12.0"]]}}"#;

        let snapshot = Snapshot::read_from(json.as_bytes()).unwrap();

        let record = &snapshot.accounts[&AccountId::from("7")];
        assert_eq!(record.holder_name, "Mei");
        assert_eq!(record.balance, dec!(12));
        assert_eq!(record.history.len(), 1);
    }

    #[test]
    fn test_balance_written_as_number() {
        let account = Account::new("1".into(), "Ann".to_owned(), dec!(10.25));

        let mut out = Vec::new();
        Snapshot::from_accounts([&account]).write_to(&mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value["1"]["balance"].is_number());
        assert_eq!(value["1"]["balance"].to_string(), "10.25");
        assert_eq!(value["1"]["history"], serde_json::json!([]));
    }

    #[test]
    fn test_max_balance_survives_round_trip() {
        let account = Account::new("1".into(), "Ann".to_owned(), Decimal::MAX);

        let mut out = Vec::new();
        Snapshot::from_accounts([&account]).write_to(&mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        let snapshot = Snapshot::read_from(out.as_slice()).unwrap();

        assert!(text.contains("\"balance\": 79228162514264337593543950335"));
        assert_eq!(snapshot.accounts[&AccountId::from("1")].balance, Decimal::MAX);
    }

    #[test]
    fn test_reads_high_precision_balance() {
        let json = r#"{"1": {"holder_name": "Ann", "balance": 12345678901234567.89, "history": []}}"#;

        let snapshot = Snapshot::read_from(json.as_bytes()).unwrap();

        assert_eq!(
            snapshot.accounts[&AccountId::from("1")].balance,
            dec!(12345678901234567.89)
        );
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        for json in [
            "{ not json",
            "[]",
            r#"{"1": {"holder_name": "Ann"}}"#,
            r#"{"1": {"holder_name": "Ann", "balance": "lots"}}"#,
            r#"{"1": {"holder_name": "Ann", "balance": 1, "history": [["noon", "x"]]}}"#,
            r#"{"1": {"holder_name": "Ann", "balance": 1, "history": [["2024-01-01 00:00:00"]]}}"#,
        ] {
            let result = Snapshot::read_from(json.as_bytes());
            assert!(
                matches!(result, Err(LedgerError::CorruptSnapshot { .. })),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn test_negative_balance_is_corrupt() {
        let json = r#"{"1": {"holder_name": "Ann", "balance": -3, "history": []}}"#;

        let err = Snapshot::read_from(json.as_bytes()).unwrap_err();

        assert!(err.to_string().contains("negative balance"));
    }
}
