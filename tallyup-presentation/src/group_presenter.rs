use crate::text_table::{Alignment, TextTableBuilder};
use std::borrow::Cow;
use tallyup_application::GroupInfo;
use tallyup_i18n as i18n;

pub struct GroupPresenter;

impl GroupPresenter {
    pub fn render(groups: &[GroupInfo]) -> String {
        if groups.is_empty() {
            return format!("{}\n", i18n::NO_GROUPS);
        }

        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::GROUP),
                Cow::Borrowed(i18n::MEMBERS),
                Cow::Borrowed(i18n::OBLIGATIONS),
            ])
            .rows(groups.iter().map(|group| {
                [
                    Cow::Borrowed(group.id.as_str()),
                    Cow::Owned(group.members.len().to_string()),
                    Cow::Owned(group.obligation_count.to_string()),
                ]
            }))
            .build()
    }
}
