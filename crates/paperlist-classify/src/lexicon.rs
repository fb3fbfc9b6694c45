//! Keyword lexicon for affiliation classification
//!
//! Matching is ASCII case-insensitive and boundary-aware: a keyword must
//! start at a word boundary, and a [`Boundary::Word`] keyword must also end
//! at one. This keeps `inc` from matching inside `Princeton`.

use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Academic,
    NonAcademic,
}

/// How a keyword is delimited in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Delimited on both sides (`inc` matches `Inc.` but not `Incyte`)
    Word,
    /// Delimited on the left only, so the term matches word stems
    /// (`univ` matches `University`, `Universität`, `Universidad`)
    Prefix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    /// Lower-case term; may contain spaces and punctuation (`s.a`, `& co`)
    pub term: String,
    pub category: Category,
    pub boundary: Boundary,
}

use Boundary::{Prefix, Word};

const ACADEMIC: &[(&str, Boundary)] = &[
    ("univ", Prefix),
    ("college", Word),
    ("colegio", Word),
    ("institut", Prefix),
    ("hospital", Prefix),
    ("hopital", Prefix),
    ("clinic", Word),
    ("clinics", Word),
    ("clinique", Word),
    ("klinik", Prefix),
    ("department", Word),
    ("departamento", Word),
    ("dept", Word),
    ("school of medicine", Word),
    ("medical school", Word),
    ("school of", Word),
    ("facult", Prefix),
    ("medical center", Word),
    ("medical centre", Word),
    ("research council", Word),
    ("academ", Prefix),
    ("polytechn", Prefix),
    ("ecole", Word),
    ("cnrs", Word),
    ("inserm", Word),
    ("national institutes of health", Word),
];

const NON_ACADEMIC: &[(&str, Boundary)] = &[
    ("inc", Word),
    ("incorporated", Word),
    ("ltd", Word),
    ("limited", Word),
    ("llc", Word),
    ("gmbh", Word),
    ("corp", Word),
    ("corporation", Word),
    ("plc", Word),
    ("s.a", Word),
    ("s.p.a", Word),
    ("s.r.l", Word),
    ("b.v", Word),
    ("k.k", Word),
    ("a/s", Word),
    ("& co", Word),
    ("company", Word),
    ("pharma", Word),
    ("pharmaceutic", Prefix),
    ("biopharma", Prefix),
    ("biotech", Prefix),
    ("therapeutics", Word),
    ("biosciences", Word),
    ("biologics", Word),
    ("holdings", Word),
    ("industries", Word),
];

/// Set of classification keywords.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    keywords: Vec<Keyword>,
}

impl Lexicon {
    /// Built-in academic and non-academic keywords.
    pub fn builtin() -> Self {
        let mut lexicon = Self::default();
        let tables = [(Category::Academic, ACADEMIC), (Category::NonAcademic, NON_ACADEMIC)];
        for (category, table) in tables {
            lexicon.keywords.extend(table.iter().map(|&(term, boundary)| Keyword {
                term: term.to_string(),
                category,
                boundary,
            }));
        }
        lexicon
    }

    /// Add whole-word keywords to `category`.
    ///
    /// Terms are lower-cased; blank terms and terms already present in the
    /// category are skipped.
    pub fn extend<I, S>(&mut self, category: Category, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known: FxHashSet<String> = self
            .keywords
            .iter()
            .filter(|k| k.category == category)
            .map(|k| k.term.clone())
            .collect();

        for term in terms {
            let term = term.as_ref().trim().to_ascii_lowercase();
            if term.is_empty() || !known.insert(term.clone()) {
                continue;
            }
            log::debug!("Lexicon: adding {category:?} keyword {term:?}");
            self.keywords.push(Keyword {
                term,
                category,
                boundary: Boundary::Word,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// First keyword of `category` found in `text`.
    pub fn find(&self, text: &str, category: Category) -> Option<&Keyword> {
        let text = text.to_ascii_lowercase();
        self.keywords
            .iter()
            .filter(|k| k.category == category)
            .find(|k| occurs(&text, &k.term, k.boundary))
    }

    pub fn matches(&self, text: &str, category: Category) -> bool {
        self.find(text, category).is_some()
    }
}

/// `term` occurs in lower-cased `text` at a word boundary.
///
/// A '.' on the left does not count as a boundary, so `s.a` does not match
/// inside `U.S.A.`.
fn occurs(text: &str, term: &str, boundary: Boundary) -> bool {
    let is_word = |c: char| c.is_alphanumeric();

    text.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let left_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word(c) && c != '.');
        let right_ok = match boundary {
            Boundary::Prefix => true,
            Boundary::Word => text[end..].chars().next().is_none_or(|c| !is_word(c)),
        };
        left_ok && right_ok
    })
}
