#[cfg(all(feature = "ja", feature = "en"))]
compile_error!("Cannot enable both 'ja' and 'en' features at the same time");

#[cfg(feature = "ja")]
pub mod strings {
    pub const MEMBER: &str = "メンバー";
    pub const BALANCE: &str = "収支";
    pub const FROM: &str = "支払人";
    pub const TO: &str = "受取人";
    pub const AMOUNT: &str = "金額";
    pub const GROUP: &str = "グループ";
    pub const EXPENSES: &str = "支出";
    pub const INCOME: &str = "受益";
    pub const TOTAL: &str = "合計";
    pub const MEMBERS: &str = "メンバー数";
    pub const OBLIGATIONS: &str = "記録数";
    pub const TOTAL_EXPENSES: &str = "立て替え合計";
    pub const TOTAL_TRANSFERS: &str = "送金合計";
    pub const NO_SETTLEMENT_NEEDED: &str = "精算は不要です";
    pub const NO_GROUPS: &str = "グループがありません";
}

#[cfg(not(feature = "ja"))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const GROUP: &str = "Group";
    pub const EXPENSES: &str = "Expenses";
    pub const INCOME: &str = "Income";
    pub const TOTAL: &str = "Total";
    pub const MEMBERS: &str = "Members";
    pub const OBLIGATIONS: &str = "Obligations";
    pub const TOTAL_EXPENSES: &str = "Total expenses";
    pub const TOTAL_TRANSFERS: &str = "Total transfers";
    pub const NO_SETTLEMENT_NEEDED: &str = "No settlement needed";
    pub const NO_GROUPS: &str = "No groups";
}

pub use strings::*;

#[cfg(feature = "ja")]
pub fn skipped_obligations(ids: impl std::fmt::Display) -> String {
    format!("無効な記録を除外しました: {ids}")
}

#[cfg(feature = "ja")]
pub fn group_not_found(name: impl std::fmt::Display) -> String {
    format!("グループ '{name}' が見つかりません")
}

#[cfg(feature = "ja")]
pub fn group_already_exists(name: impl std::fmt::Display) -> String {
    format!("グループ '{name}' は既に存在します")
}

#[cfg(feature = "ja")]
pub fn source_unavailable(detail: impl std::fmt::Display) -> String {
    format!("記録を取得できません: {detail}")
}

#[cfg(feature = "ja")]
pub fn duplicate_obligation(id: impl std::fmt::Display) -> String {
    format!("記録 {id} が重複しています")
}

#[cfg(feature = "ja")]
pub fn invalid_obligation(id: impl std::fmt::Display, reason: impl std::fmt::Display) -> String {
    format!("記録 {id} は無効です: {reason}")
}

#[cfg(feature = "ja")]
pub fn arithmetic_overflow(operation: impl std::fmt::Display) -> String {
    format!("計算中に桁あふれが発生しました ({operation})")
}

#[cfg(feature = "ja")]
pub fn imbalanced_ledger(total: impl std::fmt::Display) -> String {
    format!("収支の合計が 0 になりません (合計 {total})")
}

#[cfg(not(feature = "ja"))]
pub fn skipped_obligations(ids: impl std::fmt::Display) -> String {
    format!("Skipped invalid obligations: {ids}")
}

#[cfg(not(feature = "ja"))]
pub fn group_not_found(name: impl std::fmt::Display) -> String {
    format!("Group '{name}' was not found")
}

#[cfg(not(feature = "ja"))]
pub fn group_already_exists(name: impl std::fmt::Display) -> String {
    format!("Group '{name}' already exists")
}

#[cfg(not(feature = "ja"))]
pub fn source_unavailable(detail: impl std::fmt::Display) -> String {
    format!("Obligations are unavailable: {detail}")
}

#[cfg(not(feature = "ja"))]
pub fn duplicate_obligation(id: impl std::fmt::Display) -> String {
    format!("Obligation {id} appears more than once")
}

#[cfg(not(feature = "ja"))]
pub fn invalid_obligation(id: impl std::fmt::Display, reason: impl std::fmt::Display) -> String {
    format!("Obligation {id} is invalid: {reason}")
}

#[cfg(not(feature = "ja"))]
pub fn arithmetic_overflow(operation: impl std::fmt::Display) -> String {
    format!("Arithmetic overflow while {operation}")
}

#[cfg(not(feature = "ja"))]
pub fn imbalanced_ledger(total: impl std::fmt::Display) -> String {
    format!("Balances do not sum to zero (total {total})")
}

pub struct InvalidReasonMessage<'a> {
    kind: InvalidReasonKind<'a>,
}

enum InvalidReasonKind<'a> {
    EmptyBeneficiaries,
    NonPositiveAmount(&'a dyn std::fmt::Display),
    MissingPayer,
    MissingBeneficiary(usize),
}

pub fn empty_beneficiaries() -> InvalidReasonMessage<'static> {
    InvalidReasonMessage {
        kind: InvalidReasonKind::EmptyBeneficiaries,
    }
}

pub fn non_positive_amount(amount: &dyn std::fmt::Display) -> InvalidReasonMessage<'_> {
    InvalidReasonMessage {
        kind: InvalidReasonKind::NonPositiveAmount(amount),
    }
}

pub fn missing_payer() -> InvalidReasonMessage<'static> {
    InvalidReasonMessage {
        kind: InvalidReasonKind::MissingPayer,
    }
}

pub fn missing_beneficiary(index: usize) -> InvalidReasonMessage<'static> {
    InvalidReasonMessage {
        kind: InvalidReasonKind::MissingBeneficiary(index),
    }
}

#[cfg(feature = "ja")]
impl std::fmt::Display for InvalidReasonMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            InvalidReasonKind::EmptyBeneficiaries => write!(f, "受取人がいません"),
            InvalidReasonKind::NonPositiveAmount(amount) => {
                write!(f, "金額は正の値である必要があります ({amount})")
            }
            InvalidReasonKind::MissingPayer => write!(f, "支払人がいません"),
            InvalidReasonKind::MissingBeneficiary(index) => {
                write!(f, "{index} 番目の受取人が空です")
            }
        }
    }
}

#[cfg(not(feature = "ja"))]
impl std::fmt::Display for InvalidReasonMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            InvalidReasonKind::EmptyBeneficiaries => write!(f, "no beneficiaries"),
            InvalidReasonKind::NonPositiveAmount(amount) => {
                write!(f, "amount must be positive (found {amount})")
            }
            InvalidReasonKind::MissingPayer => write!(f, "payer is missing"),
            InvalidReasonKind::MissingBeneficiary(index) => {
                write!(f, "beneficiary at position {index} is missing")
            }
        }
    }
}
