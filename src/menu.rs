use anyhow::{Context, Result};
use ledger_core::Ledger;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Create,
    Deposit,
    Withdraw,
    Transfer,
    View,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Self::Create),
            "2" => Some(Self::Deposit),
            "3" => Some(Self::Withdraw),
            "4" => Some(Self::Transfer),
            "5" => Some(Self::View),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Numbered text menu driving a `Ledger`.
///
/// Ledger errors are printed and the loop carries on; only I/O failures on
/// the menu's own streams end it early. Running out of input counts as Exit.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn run(&mut self, ledger: &mut Ledger) -> io::Result<()> {
        loop {
            self.print_banner(ledger.name())?;

            let Some(raw) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let Some(choice) = Choice::parse(&raw) else {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                continue;
            };

            if choice == Choice::Exit {
                return Ok(());
            }

            match self.perform(choice, ledger) {
                Ok(Some(message)) => writeln!(self.output, "{message}")?,
                Ok(None) => return Ok(()),
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
    }

    fn print_banner(&mut self, bank_name: &str) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "==== Welcome to {bank_name} ====")?;
        writeln!(self.output, "1. Create Account")?;
        writeln!(self.output, "2. Deposit")?;
        writeln!(self.output, "3. Withdraw")?;
        writeln!(self.output, "4. Transfer")?;
        writeln!(self.output, "5. View Account Details")?;
        writeln!(self.output, "6. Exit")
    }

    /// `None` once the input is exhausted
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_amount(&mut self, label: &str) -> Result<Option<Decimal>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };

        let amount = raw
            .parse()
            .with_context(|| format!("'{raw}' is not a valid amount"))?;

        Ok(Some(amount))
    }

    /// Returns the message to show, or `None` if input ran out mid-prompt.
    fn perform(&mut self, choice: Choice, ledger: &mut Ledger) -> Result<Option<String>> {
        let message = match choice {
            Choice::Create => {
                let Some(id) = self.prompt("Enter new account number: ")? else {
                    return Ok(None);
                };
                let Some(name) = self.prompt("Enter account holder name: ")? else {
                    return Ok(None);
                };
                let Some(initial) = self.prompt_amount("Initial deposit: ")? else {
                    return Ok(None);
                };

                ledger.create_account(id.as_str(), name.as_str(), initial)?;

                format!("Account created successfully for {name} (A/C No: {id})")
            }
            Choice::Deposit => {
                let Some(id) = self.prompt("Enter account number: ")? else {
                    return Ok(None);
                };
                let Some(amount) = self.prompt_amount("Enter amount: ")? else {
                    return Ok(None);
                };

                ledger.deposit_to(&id, amount)?;

                format!("₹{amount} deposited to A/C {id}")
            }
            Choice::Withdraw => {
                let Some(id) = self.prompt("Enter account number: ")? else {
                    return Ok(None);
                };
                let Some(amount) = self.prompt_amount("Enter amount: ")? else {
                    return Ok(None);
                };

                ledger.withdraw_from(&id, amount)?;

                format!("₹{amount} withdrawn from A/C {id}")
            }
            Choice::Transfer => {
                let Some(from) = self.prompt("From Account: ")? else {
                    return Ok(None);
                };
                let Some(to) = self.prompt("To Account: ")? else {
                    return Ok(None);
                };
                let Some(amount) = self.prompt_amount("Amount: ")? else {
                    return Ok(None);
                };

                ledger.transfer(&from, &to, amount)?;

                format!("₹{amount} transferred from A/C {from} to A/C {to}")
            }
            Choice::View => {
                let Some(id) = self.prompt("Enter account number: ")? else {
                    return Ok(None);
                };

                ledger.view(&id)?.to_string()
            }
            Choice::Exit => return Ok(None),
        };

        Ok(Some(message))
    }
}
