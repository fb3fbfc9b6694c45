//! MEDLINE record parser
//!
//! Line-oriented parser for the tag-per-field text returned by
//! `efetch?rettype=medline`. Each field starts at column 0 with a tag of up
//! to four characters padded to the `- ` separator; lines starting with
//! whitespace continue the previous field:
//!
//! ```text
//! PMID- 31452104
//! TI  - A title that is long enough
//!       to wrap onto a second line.
//! FAU - Doe, Jane
//! AU  - Doe J
//! AD  - Pfizer Inc., 235 East 42nd Street, New York, NY 10017, USA.
//! ```
//!
//! Lines are classified first, then fed to a two-state machine
//! (`BetweenFields` / `InField`) that assembles logical fields.

use paperlist_core::{Author, Paper, find_email};
use rayon::prelude::*;

/// Record-local parse failure. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A mandatory field is absent or empty
    MissingField(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(tag) => write!(f, "record has no {tag} field"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Logical field a tag maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Identifier,
    Title,
    Date,
    /// `FAU`: starts a new author
    AuthorName,
    /// `AU`: short form, pairs with the preceding `FAU`
    AuthorShort,
    Affiliation,
    /// Any other tag: a field boundary whose content is dropped
    Other,
}

const PMID: &str = "PMID";

/// Tags the parser keeps. Everything else maps to [`Field::Other`].
const TAGS: &[(&str, Field)] = &[
    (PMID, Field::Identifier),
    ("TI", Field::Title),
    ("DP", Field::Date),
    ("FAU", Field::AuthorName),
    ("AU", Field::AuthorShort),
    ("AD", Field::Affiliation),
];

fn field_for(tag: &str) -> Field {
    TAGS.iter()
        .find(|(t, _)| *t == tag)
        .map_or(Field::Other, |&(_, field)| field)
}

/// One physical line, classified
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Tagged { tag: &'a str, content: &'a str },
    Continuation(&'a str),
    Blank,
    /// Neither tagged nor indented; treated as a field boundary
    Malformed,
}

fn classify_line(line: &str) -> Line<'_> {
    let line = line.trim_end();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(char::is_whitespace) {
        return Line::Continuation(line.trim_start());
    }

    let Some((head, content)) = line.split_once('-') else {
        return Line::Malformed;
    };
    let tag = head.trim_end();
    let tag_ok = (1..=4).contains(&tag.len())
        && tag
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !tag_ok {
        return Line::Malformed;
    }
    Line::Tagged {
        tag,
        content: content.trim(),
    }
}

#[derive(Debug, Default)]
struct AuthorDraft {
    full_name: Option<String>,
    short_name: Option<String>,
    affiliations: Vec<String>,
}

impl AuthorDraft {
    fn into_author(self) -> Option<Author> {
        let name = self
            .full_name
            .filter(|n| !n.is_empty())
            .or(self.short_name.filter(|n| !n.is_empty()))?;

        let affiliation = self
            .affiliations
            .into_iter()
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        // MEDLINE has no dedicated corresponding-author tag: the contact
        // author is the one whose affiliation carries an email address.
        let email = find_email(&affiliation).map(String::from);
        Some(Author {
            name,
            is_corresponding: email.is_some(),
            email,
            affiliation,
        })
    }
}

/// Accumulates completed fields of one record
#[derive(Debug, Default)]
struct RecordBuilder {
    pmid: Option<String>,
    title: Option<String>,
    date: Option<String>,
    authors: Vec<AuthorDraft>,
}

impl RecordBuilder {
    fn commit(&mut self, field: Field, value: String) {
        match field {
            Field::Identifier => {
                if self.pmid.is_none() {
                    self.pmid = Some(value);
                } else {
                    log::debug!("Ignoring repeated PMID field: {value}");
                }
            }
            Field::Title => {
                self.title.get_or_insert(value);
            }
            Field::Date => {
                self.date.get_or_insert(value);
            }
            Field::AuthorName => self.authors.push(AuthorDraft {
                full_name: Some(value),
                ..Default::default()
            }),
            Field::AuthorShort => match self.authors.last_mut() {
                Some(last) if last.full_name.is_some() && last.short_name.is_none() => {
                    last.short_name = Some(value);
                }
                _ => self.authors.push(AuthorDraft {
                    short_name: Some(value),
                    ..Default::default()
                }),
            },
            Field::Affiliation => match self.authors.last_mut() {
                Some(last) => last.affiliations.push(value),
                None => log::trace!("Dropping affiliation with no author: {value}"),
            },
            Field::Other => {}
        }
    }

    fn finish(self) -> Result<Paper, ParseError> {
        let pubmed_id = self
            .pmid
            .filter(|id| !id.is_empty())
            .ok_or(ParseError::MissingField(PMID))?;

        let authors = self
            .authors
            .into_iter()
            .filter_map(AuthorDraft::into_author)
            .collect();

        Ok(Paper {
            pubmed_id,
            title: self.title.unwrap_or_default(),
            publication_date: self.date.unwrap_or_default(),
            authors,
            ..Default::default()
        })
    }
}

enum State {
    BetweenFields,
    InField { field: Field, buf: String },
}

/// Parse one MEDLINE record into a [`Paper`].
///
/// Missing title or date yield empty strings; a missing or empty `PMID`
/// fails the record.
pub fn parse_record(text: &str) -> Result<Paper, ParseError> {
    let mut record = RecordBuilder::default();
    let mut state = State::BetweenFields;

    for line in text.lines() {
        state = match (state, classify_line(line)) {
            (State::InField { field, mut buf }, Line::Continuation(more)) => {
                if !more.is_empty() {
                    if !buf.is_empty() {
                        buf.push(' ');
                    }
                    buf.push_str(more);
                }
                State::InField { field, buf }
            }
            (State::BetweenFields, Line::Continuation(orphan)) => {
                log::trace!("Dropping continuation outside a field: {orphan}");
                State::BetweenFields
            }
            (prev, Line::Tagged { tag, content }) => {
                if let State::InField { field, buf } = prev {
                    record.commit(field, buf);
                }
                State::InField {
                    field: field_for(tag),
                    buf: content.to_string(),
                }
            }
            (prev, Line::Blank | Line::Malformed) => {
                if let State::InField { field, buf } = prev {
                    record.commit(field, buf);
                }
                State::BetweenFields
            }
        };
    }
    if let State::InField { field, buf } = state {
        record.commit(field, buf);
    }

    record.finish()
}

/// Split a multi-record efetch response on blank lines.
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                records.push(&text[s..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        records.push(&text[s..end]);
    }

    records
}

/// Parse every record of a multi-record text, one result per record, in
/// input order.
pub fn parse_batch(text: &str) -> Vec<Result<Paper, ParseError>> {
    split_records(text)
        .into_par_iter()
        .map(parse_record)
        .collect()
}
