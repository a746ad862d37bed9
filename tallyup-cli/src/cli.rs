use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tallyup_application::InvalidObligationPolicy;
use tallyup_infrastructure::DEFAULT_GROUP;

#[derive(Parser, Debug)]
#[command(name = "tallyup", version, about = "Shared expense ledger")]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Ledger file (overrides TALLYUP_LEDGER)")]
    pub ledger: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_enum,
        help = "What to do with invalid obligations (overrides TALLYUP_INVALID_OBLIGATIONS)"
    )]
    pub invalid_obligations: Option<PolicyArg>,
    #[arg(long, global = true, help = "Log filter (overrides TALLYUP_LOG)")]
    pub log: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List groups with member and obligation counts
    Groups,
    /// Net balance of every group member
    Balances {
        #[arg(default_value = DEFAULT_GROUP)]
        group: String,
    },
    /// Balances plus the payments that settle them
    Settle {
        #[arg(default_value = DEFAULT_GROUP)]
        group: String,
    },
    /// Expense and income totals of a group
    Costs {
        #[arg(default_value = DEFAULT_GROUP)]
        group: String,
    },
    /// Expense and income of one participant across groups
    Report { participant: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Reject,
    Skip,
}

impl From<PolicyArg> for InvalidObligationPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Reject => Self::Reject,
            PolicyArg::Skip => Self::Skip,
        }
    }
}
