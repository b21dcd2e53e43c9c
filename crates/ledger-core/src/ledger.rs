use crate::account::{ensure_positive, Account, AccountId, HistoryEntry};
use crate::error::{LedgerError, Result};
use crate::snapshot::Snapshot;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// What `Ledger::load` found at the snapshot path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No snapshot file; the ledger was left as it was.
    NotFound,
    Loaded { accounts: usize },
}

/// Read-only rendering of one account for display
#[derive(Debug, Clone, Copy)]
pub struct AccountView<'a> {
    pub holder_name: &'a str,
    pub id: &'a AccountId,
    pub balance: Decimal,
    pub history: &'a [HistoryEntry],
}

impl fmt::Display for AccountView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Holder: {}", self.holder_name)?;
        writeln!(f, "Account Number: {}", self.id)?;
        writeln!(f, "Balance: ₹{:.2}", self.balance)?;
        writeln!(f)?;
        writeln!(f, "Transaction History:")?;
        for entry in self.history {
            writeln!(f, "  {entry}")?;
        }
        write!(f, "{}", "-".repeat(40))
    }
}

/// All accounts of one bank.
///
/// Every operation either applies completely or returns an error and leaves
/// every account untouched, including transfers spanning two accounts.
#[derive(Debug, Default)]
pub struct Ledger {
    name: String,
    accounts: BTreeMap<AccountId, Account>,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Accounts ordered by account number
    pub fn accounts(&self) -> impl ExactSizeIterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    /// Opens an account with an empty history. `initial_balance` may be zero
    /// but not negative.
    pub fn create_account(
        &mut self,
        id: impl Into<AccountId>,
        holder_name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<&Account> {
        let id = id.into();
        let holder_name = holder_name.into();

        if self.accounts.contains_key(&id) {
            return Err(LedgerError::DuplicateAccount(id));
        }

        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                amount: initial_balance,
            });
        }

        info!("Account created for {holder_name} (A/C No: {id})");

        let account = Account::new(id.clone(), holder_name, initial_balance);

        Ok(&*self.accounts.entry(id).or_insert(account))
    }

    pub fn get_account(&self, id: &str) -> Result<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.into()))
    }

    fn get_account_mut(&mut self, id: &str) -> Result<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.into()))
    }

    pub fn deposit_to(&mut self, id: &str, amount: Decimal) -> Result<()> {
        self.get_account_mut(id)?.deposit(amount)?;

        debug!("₹{amount} deposited to A/C {id}");

        Ok(())
    }

    pub fn withdraw_from(&mut self, id: &str, amount: Decimal) -> Result<()> {
        self.get_account_mut(id)?.withdraw(amount)?;

        debug!("₹{amount} withdrawn from A/C {id}");

        Ok(())
    }

    /// Moves `amount` from `from` to `to` as a withdrawal followed by a
    /// deposit. All checks run before either account is touched.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<()> {
        if from == to {
            return Err(LedgerError::SameAccountTransfer(from.into()));
        }

        ensure_positive(amount)?;

        self.get_account(to)?.ensure_accepts(amount)?;
        self.get_account(from)?.ensure_covers(amount)?;

        self.get_account_mut(from)?
            .debit(amount, format!("Transferred ₹{amount} to A/C {to}"))?;
        self.get_account_mut(to)?
            .credit(amount, format!("Received ₹{amount} from A/C {from}"))?;

        debug!("₹{amount} transferred from A/C {from} to A/C {to}");

        Ok(())
    }

    pub fn view(&self, id: &str) -> Result<AccountView<'_>> {
        let account = self.get_account(id)?;

        Ok(AccountView {
            holder_name: account.holder_name(),
            id: account.id(),
            balance: account.balance(),
            history: account.history(),
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_accounts(self.accounts.values())
    }

    /// Replaces same-numbered accounts with the snapshot's, keeps the rest.
    pub fn restore(&mut self, snapshot: Snapshot) -> usize {
        let mut restored = 0;

        for account in snapshot.into_accounts() {
            self.accounts.insert(account.id().clone(), account);
            restored += 1;
        }

        restored
    }

    pub fn save_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        self.snapshot().write_to(writer)
    }

    /// Overwrites `path` with every account's current state.
    ///
    /// The file is rewritten in place; a crash mid-write can leave it
    /// truncated.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        self.save_to_writer(BufWriter::new(File::create(path)?))?;

        info!("Saved {} accounts to {}", self.len(), path.display());

        Ok(())
    }

    /// Returns the number of accounts restored. A corrupt snapshot leaves
    /// the ledger unchanged.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<usize> {
        let snapshot = Snapshot::read_from(reader)?;

        Ok(self.restore(snapshot))
    }

    /// A missing file is not an error: the ledger is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No previous data found at {}, starting fresh", path.display());

                return Ok(LoadOutcome::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let accounts = self.load_from_reader(BufReader::new(file))?;

        info!("Loaded {accounts} accounts from {}", path.display());

        Ok(LoadOutcome::Loaded { accounts })
    }
}
