use std::path::{Path, PathBuf};
use tallyup_application::{LedgerStore, ObligationDraft, SourceError};
use tallyup_domain::{GroupId, Money, ObligationKind, ParticipantId};
use tallyup_parser::{Entry, EntryKind, ParseError, Statement, parse_ledger};

/// Group that receives statements written before any `[group]` header.
pub const DEFAULT_GROUP: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read ledger file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Amount {amount} at line {line} does not fit in a ledger amount")]
    AmountOutOfRange { amount: u64, line: usize },
    #[error("Line {line}: {source}")]
    Store {
        line: usize,
        #[source]
        source: SourceError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Groups touched by the file, in first-seen order.
    pub groups: Vec<GroupId>,
    pub obligations: usize,
}

/// Feeds parsed ledger files into a store.
///
/// Groups that already exist in the store are extended, not replaced.
pub struct LedgerFileLoader<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> LedgerFileLoader<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    pub fn load_path(&self, path: &Path) -> Result<LoadSummary, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let summary = self.load_str(&content)?;
        tracing::info!(
            path = %path.display(),
            groups = summary.groups.len(),
            obligations = summary.obligations,
            "Loaded ledger file"
        );
        Ok(summary)
    }

    pub fn load_str(&self, content: &str) -> Result<LoadSummary, LoadError> {
        let ledger = parse_ledger(content)?;
        let mut summary = LoadSummary::default();
        let mut current: Option<GroupId> = None;

        for stmt in ledger.statements {
            let line = stmt.line;
            let store_err = |source| LoadError::Store { line, source };

            match stmt.statement {
                Statement::Group(name) => {
                    let group = GroupId::from(name);
                    self.ensure_group(&group, &mut summary).map_err(store_err)?;
                    current = Some(group);
                }
                Statement::Members(names) => {
                    let group = current.get_or_insert_with(|| GroupId::from(DEFAULT_GROUP));
                    self.ensure_group(group, &mut summary).map_err(store_err)?;
                    for name in names {
                        self.store
                            .add_member(group, ParticipantId::from(name))
                            .map_err(store_err)?;
                    }
                }
                Statement::Entry(entry) => {
                    let group = current.get_or_insert_with(|| GroupId::from(DEFAULT_GROUP));
                    self.ensure_group(group, &mut summary).map_err(store_err)?;
                    let draft = to_draft(entry, line)?;
                    self.store.add_obligation(group, draft).map_err(store_err)?;
                    summary.obligations += 1;
                }
            }
        }

        Ok(summary)
    }

    fn ensure_group(&self, group: &GroupId, summary: &mut LoadSummary) -> Result<(), SourceError> {
        if summary.groups.contains(group) {
            return Ok(());
        }
        match self.store.group(group) {
            Ok(_) => {}
            Err(SourceError::GroupNotFound(_)) => {
                self.store.create_group(group.clone(), Vec::new())?;
            }
            Err(err) => return Err(err),
        }
        summary.groups.push(group.clone());
        Ok(())
    }
}

fn to_draft(entry: Entry<'_>, line: usize) -> Result<ObligationDraft, LoadError> {
    let amount = i64::try_from(entry.amount).map_err(|_| LoadError::AmountOutOfRange {
        amount: entry.amount,
        line,
    })?;
    let kind = match entry.kind {
        EntryKind::Expense => ObligationKind::Expense,
        EntryKind::Transfer => ObligationKind::Transfer,
    };

    Ok(ObligationDraft {
        name: entry.label.unwrap_or_default().to_string(),
        kind,
        payer: ParticipantId::from(entry.payer),
        beneficiaries: entry
            .beneficiaries
            .into_iter()
            .map(ParticipantId::from)
            .collect(),
        amount: Money::from_minor(amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryLedgerStore;
    use rstest::{fixture, rstest};
    use tallyup_application::ObligationSource;

    #[fixture]
    fn store() -> InMemoryLedgerStore {
        InMemoryLedgerStore::new()
    }

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().copied().map(ParticipantId::from).collect()
    }

    #[rstest]
    fn statements_without_header_go_to_default_group(store: InMemoryLedgerStore) {
        let summary = LedgerFileLoader::new(&store)
            .load_str("alice paid 10 to bob")
            .expect("load");

        let default = GroupId::from(DEFAULT_GROUP);
        assert_eq!(summary.groups, vec![default.clone()]);
        assert_eq!(summary.obligations, 1);
        assert_eq!(store.members_of(&default), Ok(ids(&["alice", "bob"])));
    }

    #[rstest]
    fn headers_switch_groups(store: InMemoryLedgerStore) {
        let content = "\
[trip]
members alice, bob, carol
alice paid 2500 to alice, bob, carol \"Dinner\"
bob sent 1000 to alice

[flat]
dave paid 300 to erin
";
        let summary = LedgerFileLoader::new(&store).load_str(content).expect("load");

        let trip = GroupId::from("trip");
        let flat = GroupId::from("flat");
        assert_eq!(summary.groups, vec![trip.clone(), flat.clone()]);
        assert_eq!(summary.obligations, 3);

        let trip_obligations = store.obligations_for_group(&trip).expect("trip");
        assert_eq!(trip_obligations.len(), 2);
        assert_eq!(trip_obligations[0].name, "Dinner");
        assert_eq!(trip_obligations[0].beneficiaries, ids(&["alice", "bob", "carol"]));
        assert_eq!(trip_obligations[1].kind, ObligationKind::Transfer);
        assert_eq!(store.members_of(&flat), Ok(ids(&["dave", "erin"])));
    }

    #[rstest]
    fn existing_groups_are_extended(store: InMemoryLedgerStore) {
        let trip = GroupId::from("trip");
        store
            .create_group(trip.clone(), ids(&["zoe"]))
            .expect("create");

        LedgerFileLoader::new(&store)
            .load_str("[trip]\nalice paid 10 to bob")
            .expect("load");

        assert_eq!(store.members_of(&trip), Ok(ids(&["zoe", "alice", "bob"])));
    }

    #[rstest]
    fn repeated_header_appends_to_group(store: InMemoryLedgerStore) {
        let summary = LedgerFileLoader::new(&store)
            .load_str("[trip]\na paid 1 to b\n[flat]\nc paid 1 to d\n[trip]\na paid 2 to b")
            .expect("load");

        assert_eq!(summary.groups.len(), 2);
        assert_eq!(
            store.group(&GroupId::from("trip")).map(|g| g.obligation_count),
            Ok(2)
        );
    }

    #[rstest]
    fn parse_errors_are_surfaced(store: InMemoryLedgerStore) {
        let result = LedgerFileLoader::new(&store).load_str("[trip]\nalice paid to bob");
        assert!(matches!(
            result,
            Err(LoadError::Parse(ParseError::SyntaxError { line: 2, .. }))
        ));
    }

    #[rstest]
    fn oversized_amount_is_rejected(store: InMemoryLedgerStore) {
        let result = LedgerFileLoader::new(&store).load_str("a paid 9223372036854775808 to b");
        assert!(matches!(
            result,
            Err(LoadError::AmountOutOfRange { line: 1, .. })
        ));
    }

    #[rstest]
    fn missing_file_reports_path(store: InMemoryLedgerStore) {
        let path = Path::new("/nonexistent/tallyup/ledger.txt");
        let result = LedgerFileLoader::new(&store).load_path(path);
        match result {
            Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
