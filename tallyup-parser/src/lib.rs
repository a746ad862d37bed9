#![warn(clippy::uninlined_format_args)]

//! Parser for the line-oriented ledger format.
//!
//! ```text
//! [trip]
//! members alice, bob, carol
//! alice paid 2500 to alice, bob, carol "Dinner"
//! bob sent 1000 to alice
//! アリス が ボブ、キャロル に 300円 立て替えた
//! ```
//!
//! Amounts are unsigned integers in minor units. Japanese statements need
//! whitespace around the particles `が` and `に`.

mod i18n;

use fxhash::FxHashMap;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while1},
    character::complete::{char, multispace1, u64},
    combinator::{opt, recognize},
    multi::{many0, many1, separated_list1},
    sequence::delimited,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Expense,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub payer: &'a str,
    pub amount: u64,
    pub beneficiaries: Vec<&'a str>,
    pub kind: EntryKind,
    pub label: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    Group(&'a str),
    Members(Vec<&'a str>),
    Entry(Entry<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("Unknown member '{name}' at line {line}.")]
    UnknownMember { name: String, line: usize },
}

fn blank(input: &str) -> IResult<&str, &str> {
    fn fullwidth_space(input: &str) -> IResult<&str, &str> {
        take_while1(|c: char| c == '\u{3000}')(input)
    }

    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    alt((multispace1, fullwidth_space, comment, line_comment)).parse(input)
}

fn sp(input: &str) -> IResult<&str, &str> {
    recognize(many0(blank)).parse(input)
}

// Keywords must be followed by a separator so `to` does not swallow `tobias`.
fn sp1(input: &str) -> IResult<&str, &str> {
    recognize(many1(blank)).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

fn list_separator(input: &str) -> IResult<&str, &str> {
    (sp, alt((tag(","), tag("，"), tag("、"))), sp)
        .map(|(_, sep, _)| sep)
        .parse(input)
}

fn name_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(list_separator, identifier).parse(input)
}

fn label(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"')).parse(input)
}

fn trailing_label(input: &str) -> IResult<&str, Option<&str>> {
    opt((sp, label).map(|(_, label)| label)).parse(input)
}

// [name]
fn group_header(input: &str) -> IResult<&str, &str> {
    delimited((char('['), sp), identifier, (sp, char(']'))).parse(input)
}

// members a, b, c
fn members_decl(input: &str) -> IResult<&str, Vec<&str>> {
    (
        alt((tag_no_case("members"), tag("メンバー"))),
        sp1,
        name_list,
    )
        .map(|(_, _, names)| names)
        .parse(input)
}

fn verb_en(input: &str) -> IResult<&str, EntryKind> {
    alt((
        tag_no_case("paid").map(|_| EntryKind::Expense),
        tag_no_case("sent").map(|_| EntryKind::Transfer),
    ))
    .parse(input)
}

fn verb_ja(input: &str) -> IResult<&str, EntryKind> {
    alt((
        alt((tag("立て替えた"), tag("たてかえた"))).map(|_| EntryKind::Expense),
        tag("送金した").map(|_| EntryKind::Transfer),
    ))
    .parse(input)
}

fn yen(input: &str) -> IResult<&str, u64> {
    (u64, opt(alt((tag("円"), tag("えん")))))
        .map(|(amount, _)| amount)
        .parse(input)
}

// {payer} paid {amount} to {beneficiaries} ["label"]
fn entry_en(input: &str) -> IResult<&str, Entry<'_>> {
    (
        identifier, // payer
        sp1,
        verb_en,
        sp1,
        u64, // amount
        sp1,
        tag_no_case("to"),
        sp1,
        name_list, // beneficiaries
        trailing_label,
    )
        .map(
            |(payer, _, kind, _, amount, _, _, _, beneficiaries, label)| Entry {
                payer,
                amount,
                beneficiaries,
                kind,
                label,
            },
        )
        .parse(input)
}

// {payer} が {beneficiaries} に {amount} 立て替えた ["label"]
fn entry_ja(input: &str) -> IResult<&str, Entry<'_>> {
    (
        identifier, // payer
        sp1,
        tag("が"),
        sp1,
        name_list, // beneficiaries
        sp1,
        tag("に"),
        sp1,
        yen, // amount
        sp,
        verb_ja,
        trailing_label,
    )
        .map(
            |(payer, _, _, _, beneficiaries, _, _, _, amount, _, kind, label)| Entry {
                payer,
                amount,
                beneficiaries,
                kind,
                label,
            },
        )
        .parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        group_header.map(Statement::Group),
        entry_en.map(Statement::Entry),
        entry_ja.map(Statement::Entry),
        members_decl.map(Statement::Members),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

/// Parses a whole ledger, one statement per line.
///
/// When a group declares `members`, every later entry of that group may only
/// name declared members, including entries under a reopened header.
/// Statements before the first header belong to an unnamed group.
pub fn parse_ledger(input: &str) -> Result<Ledger<'_>, ParseError> {
    let mut statements = Vec::new();
    let mut current: Option<&str> = None;
    let mut declared: FxHashMap<Option<&str>, Vec<&str>> = FxHashMap::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: i18n::syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }

        let (rest, stmt) = statement_with_sp(rest).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: i18n::syntax_error_detail(e),
        })?;
        if !rest.trim().is_empty() {
            return Err(ParseError::SyntaxError {
                line: line_no,
                detail: i18n::syntax_error_unparsed_detail(rest.trim()),
            });
        }

        match &stmt {
            Statement::Group(name) => current = Some(*name),
            Statement::Members(names) => {
                declared
                    .entry(current)
                    .or_default()
                    .extend(names.iter().copied());
            }
            Statement::Entry(entry) => {
                if let Some(members) = declared.get(&current)
                    && let Some(unknown) = std::iter::once(&entry.payer)
                        .chain(entry.beneficiaries.iter())
                        .find(|name| !members.contains(name))
                {
                    return Err(ParseError::UnknownMember {
                        name: (*unknown).to_string(),
                        line: line_no,
                    });
                }
            }
        }

        statements.push(StatementWithLine {
            line: line_no,
            statement: stmt,
        });
    }

    Ok(Ledger { statements })
}
