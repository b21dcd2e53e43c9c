use crate::error::{LedgerError, Result};
use chrono::{Local, NaiveDateTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Wall-clock format used for history timestamps, on screen and on disk.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Account number, opaque to the ledger
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One balance-affecting event in an account's history.
///
/// Persisted as a `[timestamp, description]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "(String, String)", try_from = "(String, String)")]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub description: String,
}

impl HistoryEntry {
    /// Stamps `description` with the current local time, to the second
    pub fn now(description: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local().trunc_subsecs(0),
            description: description.into(),
        }
    }
}

impl From<HistoryEntry> for (String, String) {
    fn from(entry: HistoryEntry) -> Self {
        (
            entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            entry.description,
        )
    }
}

impl TryFrom<(String, String)> for HistoryEntry {
    type Error = chrono::ParseError;

    fn try_from((timestamp, description): (String, String)) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)?,
            description,
        })
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.description
        )
    }
}

/// Rejects zero and negative amounts
pub(crate) fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount { amount });
    }

    Ok(())
}

/// A single holder's balance and append-only history.
///
/// The balance never drops below zero: every mutation that would break this
/// is refused before anything changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    holder_name: String,
    balance: Decimal,
    history: Vec<HistoryEntry>,
}

impl Account {
    pub(crate) const fn new(id: AccountId, holder_name: String, balance: Decimal) -> Self {
        Self {
            id,
            holder_name,
            balance,
            history: Vec::new(),
        }
    }

    pub(crate) const fn restore(
        id: AccountId,
        holder_name: String,
        balance: Decimal,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            id,
            holder_name,
            balance,
            history,
        }
    }

    pub const fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Oldest entry first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub(crate) fn deposit(&mut self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        self.credit(amount, format!("Deposited ₹{amount}"))
    }

    pub(crate) fn withdraw(&mut self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        self.debit(amount, format!("Withdrew ₹{amount}"))
    }

    /// Fails with `InsufficientFunds` if `amount` exceeds the balance.
    pub(crate) fn ensure_covers(&self, amount: Decimal) -> Result<()> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                account: self.id.clone(),
                balance: self.balance,
                requested: amount,
            });
        }

        Ok(())
    }

    /// Balance after adding `amount`, or `BalanceOverflow` if it does not fit.
    pub(crate) fn ensure_accepts(&self, amount: Decimal) -> Result<Decimal> {
        self.balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                account: self.id.clone(),
                balance: self.balance,
                amount,
            })
    }

    /// Caller has already checked `amount` is positive.
    pub(crate) fn credit(&mut self, amount: Decimal, description: String) -> Result<()> {
        self.balance = self.ensure_accepts(amount)?;
        self.history.push(HistoryEntry::now(description));

        Ok(())
    }

    /// Caller has already checked `amount` is positive.
    pub(crate) fn debit(&mut self, amount: Decimal, description: String) -> Result<()> {
        self.ensure_covers(amount)?;

        self.balance -= amount;
        self.history.push(HistoryEntry::now(description));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(balance: Decimal) -> Account {
        Account::new("1001".into(), "Asha".to_owned(), balance)
    }

    #[test]
    fn test_deposit() {
        let mut account = account(dec!(500));

        account.deposit(dec!(200)).unwrap();

        assert_eq!(account.balance(), dec!(700));
        assert_eq!(account.history().len(), 1);
        assert_eq!(account.history()[0].description, "Deposited ₹200");
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut account = account(dec!(100));

        for amount in [dec!(0), dec!(-5), dec!(-0.01)] {
            assert!(matches!(
                account.deposit(amount),
                Err(LedgerError::InvalidAmount { .. })
            ));
            assert!(matches!(
                account.withdraw(amount),
                Err(LedgerError::InvalidAmount { .. })
            ));
        }

        assert_eq!(account.balance(), dec!(100));
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account(dec!(250.75));

        account.withdraw(dec!(250.75)).unwrap();

        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.history()[0].description, "Withdrew ₹250.75");
    }

    #[test]
    fn test_insufficient_funds() {
        let mut account = account(dec!(100));

        let err = account.withdraw(dec!(100.01)).unwrap_err();

        match err {
            LedgerError::InsufficientFunds {
                account: id,
                balance,
                requested,
            } => {
                assert_eq!(id.as_str(), "1001");
                assert_eq!(balance, dec!(100));
                assert_eq!(requested, dec!(100.01));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(account.balance(), dec!(100));
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_deposit_past_max_balance() {
        let mut account = account(Decimal::MAX);

        let err = account.deposit(dec!(1)).unwrap_err();

        assert!(matches!(err, LedgerError::BalanceOverflow { .. }));
        assert_eq!(account.balance(), Decimal::MAX);
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_deposit_withdraw_round_trip() {
        let mut account = account(dec!(42.10));

        account.deposit(dec!(0.35)).unwrap();
        account.withdraw(dec!(0.35)).unwrap();

        assert_eq!(account.balance(), dec!(42.10));
        assert_eq!(account.history().len(), 2);
    }

    #[test]
    fn test_history_entry_timestamp_has_whole_seconds() {
        let entry = HistoryEntry::now("Deposited ₹1");

        let (timestamp, description): (String, String) = entry.clone().into();
        assert_eq!(timestamp.len(), "2024-01-31 09:05:00".len());
        assert_eq!(description, "Deposited ₹1");
        assert_eq!(HistoryEntry::try_from((timestamp, description)).unwrap(), entry);
    }

    #[test]
    fn test_history_entry_rejects_bad_timestamp() {
        let pair = ("yesterday".to_owned(), "Deposited ₹1".to_owned());

        assert!(HistoryEntry::try_from(pair).is_err());
    }

    #[test]
    fn test_history_entry_display() {
        let entry = HistoryEntry::try_from((
            "2024-03-05 14:07:09".to_owned(),
            "Withdrew ₹20".to_owned(),
        ))
        .unwrap();

        assert_eq!(entry.to_string(), "2024-03-05 14:07:09 - Withdrew ₹20");
    }
}
