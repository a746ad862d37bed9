use arcstr::ArcStr;
use std::{collections::BTreeMap, fmt};

/// Identifier of a participant.
///
/// Ordered lexicographically; this order is the tie-break order used by the
/// settlement planner.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(ArcStr);

impl ParticipantId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(ArcStr::from(value))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an obligation group (a "project").
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(ArcStr);

impl GroupId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(ArcStr::from(value))
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(ArcStr::from(value))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObligationId(pub u64);

impl fmt::Display for ObligationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monetary amount in integer minor units (e.g. cents).
///
/// Only checked arithmetic is exposed so that overflow is always observable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn from_minor(value: i64) -> Self {
        Self(value)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    pub fn checked_abs(self) -> Option<Self> {
        self.0.checked_abs().map(Self)
    }

    /// Converts a wide accumulator back into `Money`, failing when it does not fit.
    pub fn from_wide(value: i128) -> Option<Self> {
        i64::try_from(value).ok().map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of an obligation. Affects reporting only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObligationKind {
    #[default]
    Expense,
    Transfer,
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => f.write_str("expense"),
            Self::Transfer => f.write_str("transfer"),
        }
    }
}

/// A recorded shared expense or transfer: one payer, one or more beneficiaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obligation {
    pub id: ObligationId,
    pub group: GroupId,
    pub name: String,
    pub kind: ObligationKind,
    pub payer: ParticipantId,
    /// Order is significant: remainder units go to the first beneficiaries.
    pub beneficiaries: Vec<ParticipantId>,
    pub amount: Money,
}

impl Obligation {
    pub fn new(
        id: ObligationId,
        group: GroupId,
        payer: ParticipantId,
        beneficiaries: Vec<ParticipantId>,
        amount: Money,
    ) -> Self {
        Self {
            id,
            group,
            name: String::new(),
            kind: ObligationKind::Expense,
            payer,
            beneficiaries,
            amount,
        }
    }

    pub fn with_kind(mut self, kind: ObligationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// One payer -> beneficiary share of an obligation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebtEdge {
    pub source: ParticipantId,
    pub target: ParticipantId,
    pub amount: Money,
}

/// Net position per participant. Positive: is owed money. Negative: owes money.
pub type Balances = BTreeMap<ParticipantId, Money>;

/// Directive for `from` (a debtor) to pay `amount` to `to` (a creditor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementInstruction {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Settlement {
    pub new_balances: Balances,
    pub instructions: Vec<SettlementInstruction>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CostSummary {
    /// Shares the participant paid for others (and themselves).
    pub expenses: Money,
    /// Shares paid on the participant's behalf.
    pub income: Money,
    /// `expenses - income`.
    pub balance: Money,
}

impl CostSummary {
    pub const ZERO: Self = Self {
        expenses: Money::ZERO,
        income: Money::ZERO,
        balance: Money::ZERO,
    };
}

/// Cost overview of one set of obligations (typically a group).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupCost {
    pub total_expenses: Money,
    pub total_transfers: Money,
    pub per_participant: BTreeMap<ParticipantId, CostSummary>,
}

/// Costs of one participant across the groups they take part in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantCost {
    pub participant: ParticipantId,
    pub total: CostSummary,
    pub per_group: BTreeMap<GroupId, CostSummary>,
}
