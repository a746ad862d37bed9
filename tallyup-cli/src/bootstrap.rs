use crate::cli::{Cli, Commands};
use std::{borrow::Cow, env, path::PathBuf};
use tallyup_application::{InvalidObligationPolicy, LedgerService, LedgerStore};
use tallyup_domain::{GroupId, ParticipantId};
use tallyup_infrastructure::{InMemoryLedgerStore, LedgerFileLoader, TracingObserver};
use tallyup_presentation::{
    CostPresenter, GroupPresenter, SettlementPresenter, format_service_error,
};
use tracing_subscriber::EnvFilter;

pub type CliResult<T> = Result<T, Cow<'static, str>>;

const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration: environment first, command-line flags on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub ledger: Option<PathBuf>,
    pub policy: InvalidObligationPolicy,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> CliResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CliResult<Self> {
        let policy = match lookup("TALLYUP_INVALID_OBLIGATIONS") {
            Some(value) => value
                .parse()
                .map_err(|err| format!("TALLYUP_INVALID_OBLIGATIONS: {err}"))?,
            None => InvalidObligationPolicy::default(),
        };
        let log_filter = lookup("TALLYUP_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            ledger: lookup("TALLYUP_LEDGER").map(PathBuf::from),
            policy,
            log_filter,
        })
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(ledger) = &cli.ledger {
            self.ledger = Some(ledger.clone());
        }
        if let Some(policy) = cli.invalid_obligations {
            self.policy = policy.into();
        }
        if let Some(filter) = &cli.log {
            self.log_filter = filter.clone();
        }
        self
    }
}

/// Logs go to stderr so reports on stdout stay clean.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> CliResult<()> {
    let config = AppConfig::from_env()?.with_overrides(&cli);
    init_logging(&config.log_filter);

    let Some(ledger) = config.ledger.as_deref() else {
        return Err("No ledger file given; pass --ledger or set TALLYUP_LEDGER".into());
    };

    let store = InMemoryLedgerStore::new();
    LedgerFileLoader::new(&store)
        .load_path(ledger)
        .map_err(|err| err.to_string())?;

    let observer = TracingObserver::new();
    let service = LedgerService::new(&store, &observer).with_policy(config.policy);
    let output = execute(&cli.command, &store, &service)?;
    print!("{output}");

    if observer.skipped() > 0 {
        tracing::warn!(skipped = observer.skipped(), "Some obligations were excluded");
    }
    Ok(())
}

fn execute(
    command: &Commands,
    store: &InMemoryLedgerStore,
    service: &LedgerService<'_>,
) -> CliResult<String> {
    let output = match command {
        Commands::Groups => GroupPresenter::render(&store.groups()),
        Commands::Balances { group } => {
            let report = service.group_balances(&GroupId::from(group.as_str()));
            SettlementPresenter::render_balances(&report.map_err(|e| format_service_error(&e))?)
        }
        Commands::Settle { group } => {
            let result = service.settle_group(&GroupId::from(group.as_str()));
            SettlementPresenter::render(&result.map_err(|e| format_service_error(&e))?).to_text()
        }
        Commands::Costs { group } => {
            let group = GroupId::from(group.as_str());
            let cost = service
                .group_costs(&group)
                .map_err(|e| format_service_error(&e))?;
            CostPresenter::render_group(&group, &cost)
        }
        Commands::Report { participant } => {
            let cost = service
                .participant_costs(&ParticipantId::from(participant.as_str()))
                .map_err(|e| format_service_error(&e))?;
            CostPresenter::render_participant(&cost)
        }
    };
    Ok(output)
}
