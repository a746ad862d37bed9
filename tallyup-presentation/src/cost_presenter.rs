use crate::{
    settlement_presenter::signed,
    text_table::{Alignment, TextTableBuilder},
};
use std::borrow::Cow;
use tallyup_domain::{CostSummary, GroupCost, GroupId, ParticipantCost};
use tallyup_i18n as i18n;

const COST_ALIGNMENTS: [Alignment; 4] = [
    Alignment::Left,
    Alignment::Right,
    Alignment::Right,
    Alignment::Right,
];

pub struct CostPresenter;

impl CostPresenter {
    /// Kind totals followed by one row per participant.
    pub fn render_group(group: &GroupId, cost: &GroupCost) -> String {
        let mut out = format!(
            "{}: {group}\n{}: {}\n{}: {}\n\n",
            i18n::GROUP,
            i18n::TOTAL_EXPENSES,
            cost.total_expenses,
            i18n::TOTAL_TRANSFERS,
            cost.total_transfers,
        );

        let table = TextTableBuilder::new()
            .alignments(&COST_ALIGNMENTS)
            .headers(&[
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::EXPENSES),
                Cow::Borrowed(i18n::INCOME),
                Cow::Borrowed(i18n::BALANCE),
            ])
            .rows(
                cost.per_participant
                    .iter()
                    .map(|(participant, summary)| summary_row(participant.as_str(), summary)),
            )
            .build();
        out.push_str(&table);
        out
    }

    /// One row per group, then the participant's overall total.
    pub fn render_participant(cost: &ParticipantCost) -> String {
        let mut out = format!("{}: {}\n\n", i18n::MEMBER, cost.participant);

        let table = TextTableBuilder::new()
            .alignments(&COST_ALIGNMENTS)
            .headers(&[
                Cow::Borrowed(i18n::GROUP),
                Cow::Borrowed(i18n::EXPENSES),
                Cow::Borrowed(i18n::INCOME),
                Cow::Borrowed(i18n::BALANCE),
            ])
            .rows(
                cost.per_group
                    .iter()
                    .map(|(group, summary)| summary_row(group.as_str(), summary)),
            )
            .row(summary_row(i18n::TOTAL, &cost.total))
            .build();
        out.push_str(&table);
        out
    }
}

fn summary_row<'a>(label: &'a str, summary: &CostSummary) -> [Cow<'a, str>; 4] {
    [
        Cow::Borrowed(label),
        Cow::Owned(summary.expenses.to_string()),
        Cow::Owned(summary.income.to_string()),
        Cow::Owned(signed(summary.balance)),
    ]
}
