use crate::text_table::{Alignment, TextTableBuilder};
use std::borrow::Cow;
use tallyup_application::{BalanceReport, PersonBalance, SettlementResult};
use tallyup_domain::{Money, ObligationId, SettlementInstruction};
use tallyup_i18n as i18n;

pub struct SettlementPresenter;

pub struct SettlementView {
    pub balance_table: String,
    /// `None` when every balance is already zero.
    pub instruction_table: Option<String>,
    pub skipped_note: Option<String>,
}

impl SettlementView {
    pub fn to_text(&self) -> String {
        let mut sections = vec![self.balance_table.clone()];
        sections.push(match &self.instruction_table {
            Some(table) => table.clone(),
            None => format!("{}\n", i18n::NO_SETTLEMENT_NEEDED),
        });
        if let Some(note) = &self.skipped_note {
            sections.push(format!("{note}\n"));
        }
        sections.join("\n")
    }
}

impl SettlementPresenter {
    pub fn render(result: &SettlementResult) -> SettlementView {
        let balance_table = Self::build_balance_table(&result.balances);
        let instruction_table = (!result.instructions.is_empty())
            .then(|| Self::build_instruction_table(&result.instructions));

        SettlementView {
            balance_table,
            instruction_table,
            skipped_note: skipped_note(&result.skipped),
        }
    }

    pub fn render_balances(report: &BalanceReport) -> String {
        let mut text = Self::build_balance_table(&report.balances);
        if let Some(note) = skipped_note(&report.skipped) {
            text.push('\n');
            text.push_str(&note);
            text.push('\n');
        }
        text
    }

    pub fn build_balance_table(person_balances: &[PersonBalance]) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(i18n::MEMBER), Cow::Borrowed(i18n::BALANCE)]);

        for person in person_balances {
            builder = builder.row([
                Cow::Borrowed(person.id.as_str()),
                Cow::Owned(signed(person.balance)),
            ]);
        }

        builder.build()
    }

    /// Instructions are listed in execution order.
    pub fn build_instruction_table(instructions: &[SettlementInstruction]) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::FROM),
                Cow::Borrowed(i18n::TO),
                Cow::Borrowed(i18n::AMOUNT),
            ]);

        for instruction in instructions {
            builder = builder.row([
                Cow::Borrowed(instruction.from.as_str()),
                Cow::Borrowed(instruction.to.as_str()),
                Cow::Owned(instruction.amount.to_string()),
            ]);
        }

        builder.build()
    }
}

pub(crate) fn signed(amount: Money) -> String {
    let sign = if amount.is_negative() { "" } else { "+" };
    format!("{sign}{amount}")
}

fn skipped_note(skipped: &[ObligationId]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }
    let ids: Vec<String> = skipped.iter().map(ToString::to_string).collect();
    Some(i18n::skipped_obligations(ids.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tallyup_domain::{GroupId, ParticipantId};

    fn person(id: &str, balance: i64) -> PersonBalance {
        PersonBalance {
            id: ParticipantId::from(id),
            balance: Money::from_minor(balance),
        }
    }

    fn sample_result(instructions: Vec<SettlementInstruction>) -> SettlementResult {
        SettlementResult {
            group: GroupId::from("trip"),
            balances: vec![person("alice", 24), person("bob", -12), person("carol", -12)],
            instructions,
            skipped: Vec::new(),
        }
    }

    fn instruction(from: &str, to: &str, amount: i64) -> SettlementInstruction {
        SettlementInstruction {
            from: ParticipantId::from(from),
            to: ParticipantId::from(to),
            amount: Money::from_minor(amount),
        }
    }

    #[test]
    fn balance_table_signs_amounts() {
        let table = SettlementPresenter::build_balance_table(&[
            person("alice", 24),
            person("bob", -24),
            person("carol", 0),
        ]);

        let rows: Vec<(&str, &str)> = table
            .lines()
            .skip(2)
            .filter_map(|line| line.split_once(" | "))
            .map(|(name, balance)| (name.trim_end(), balance.trim_start()))
            .collect();
        assert_eq!(rows, vec![("alice", "+24"), ("bob", "-24"), ("carol", "+0")]);
    }

    #[cfg(not(feature = "ja"))]
    #[test]
    fn balance_table_renders_aligned_rows() {
        let table = SettlementPresenter::build_balance_table(&[
            person("alice", 1200),
            person("bob", -5),
        ]);

        assert_eq!(
            table,
            "Member | Balance\n-------+--------\nalice  |   +1200\nbob    |      -5\n"
        );
    }

    #[test]
    fn instructions_keep_planner_order() {
        let view = SettlementPresenter::render(&sample_result(vec![
            instruction("carol", "alice", 12),
            instruction("bob", "alice", 12),
        ]));

        let table = view.instruction_table.expect("instruction table");
        let carol = table.find("carol").expect("carol row");
        let bob = table.find("bob").expect("bob row");
        assert!(carol < bob);
    }

    #[rstest]
    #[case::settled(Vec::new(), true)]
    #[case::open(vec![instruction("bob", "alice", 12)], false)]
    fn text_mentions_when_nothing_to_settle(
        #[case] instructions: Vec<SettlementInstruction>,
        #[case] settled: bool,
    ) {
        let text = SettlementPresenter::render(&sample_result(instructions)).to_text();
        assert_eq!(text.contains(i18n::NO_SETTLEMENT_NEEDED), settled);
    }

    #[test]
    fn skipped_obligations_are_listed() {
        let report = BalanceReport {
            group: GroupId::from("trip"),
            balances: vec![person("alice", 0)],
            skipped: vec![ObligationId(3), ObligationId(5)],
        };

        let text = SettlementPresenter::render_balances(&report);
        assert!(text.contains("#3, #5"));
    }
}
