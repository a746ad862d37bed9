use std::borrow::Cow;

const COLUMN_SEPARATOR: &str = " | ";
const RULE_SEPARATOR: &str = "-+-";

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Renders a header line, a rule and one line per row. Cells beyond the
    /// header count are dropped.
    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().enumerate().take(col_count) {
                col_widths[i] = col_widths[i].max(display_width(cell));
            }
        }

        let mut out = String::with_capacity(256);
        self.write_line(&mut out, self.headers, &col_widths);

        let rule: Vec<String> = col_widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join(RULE_SEPARATOR));
        out.push('\n');

        for row in &self.rows {
            self.write_line(&mut out, row.as_ref(), &col_widths);
        }

        out
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        let mut line = String::new();
        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_SEPARATOR);
            }
            let cell = cells.get(i).map_or("", |c| &**c);
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            pad_cell(&mut line, cell, *width, alignment);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn pad_cell(line: &mut String, cell: &str, width: usize, alignment: Alignment) {
    let pad = width.saturating_sub(display_width(cell));
    let (left, right) = match alignment {
        Alignment::Left => (0, pad),
        Alignment::Center => (pad / 2, pad - pad / 2),
        Alignment::Right => (pad, 0),
    };
    line.extend(std::iter::repeat_n(' ', left));
    line.push_str(cell);
    line.extend(std::iter::repeat_n(' ', right));
}

// Non-ASCII text is assumed to be full width (CJK names).
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}
