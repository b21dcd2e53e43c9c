use clap::Parser;
use std::path::{Path, PathBuf};

/// Trait for reading configuration parameters
pub trait Config {
    fn data_path(&self) -> &Path;
    fn bank_name(&self) -> &str;
}

/// CLI configuration
#[derive(Parser, Debug)]
#[command(
    name = "ledger-manager",
    about = "Interactive bank ledger with deposits, withdrawals, transfers and a JSON snapshot",
    version
)]
pub struct CliConfig {
    /// Snapshot loaded at start and overwritten on exit
    #[arg(long, value_name = "PATH", default_value = "bank_data.json")]
    data_file: PathBuf,

    /// Name shown in the menu banner
    #[arg(long, default_value = "AI National Bank")]
    bank_name: String,
}

impl Config for CliConfig {
    fn data_path(&self) -> &Path {
        &self.data_file
    }

    fn bank_name(&self) -> &str {
        &self.bank_name
    }
}
