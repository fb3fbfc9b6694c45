//! Affiliation classification and organization-name extraction
//!
//! An affiliation string may name several institutions separated by `;`.
//! Each chunk is classified on its own, then the chunk verdicts are combined
//! according to [`AcademicPrecedence`].

use paperlist_core::email::is_email;
use serde::Deserialize;

use crate::lexicon::{Category, Lexicon};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Academic,
    NonAcademic,
    Unknown,
}

/// How academic evidence in one chunk interacts with industry evidence in
/// another chunk of the same affiliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcademicPrecedence {
    /// Any academic chunk makes the whole affiliation academic.
    #[default]
    AnyChunk,
    /// Any industrial chunk makes the whole affiliation non-academic.
    AllChunks,
}

impl std::str::FromStr for AcademicPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any-chunk" => Ok(Self::AnyChunk),
            "all-chunks" => Ok(Self::AllChunks),
            other => Err(format!(
                "unknown precedence {other:?} (expected any-chunk or all-chunks)"
            )),
        }
    }
}

impl std::fmt::Display for AcademicPrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AnyChunk => "any-chunk",
            Self::AllChunks => "all-chunks",
        })
    }
}

/// Classification of one affiliation string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub classification: Classification,
    /// Inferred organization, set only for [`Classification::NonAcademic`]
    pub organization: Option<String>,
}

impl Verdict {
    fn of(classification: Classification) -> Self {
        Self {
            classification,
            organization: None,
        }
    }

    pub fn is_non_academic(&self) -> bool {
        self.classification == Classification::NonAcademic
    }
}

const ELECTRONIC_ADDRESS: &str = "electronic address:";

/// Legal-form segments that belong to the preceding company name
const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "ltd", "limited", "llc", "gmbh", "corp", "corporation", "plc", "co",
    "s.a", "sa", "ag", "s.p.a", "b.v", "bv", "nv", "k.k", "a/s", "co. ltd",
];

const COUNTRIES: &[&str] = &[
    "usa", "u.s.a", "united states", "united states of america", "us", "uk", "united kingdom",
    "england", "scotland", "wales", "canada", "australia", "germany", "france", "italy", "spain",
    "japan", "china", "india", "brazil", "netherlands", "the netherlands", "sweden",
    "switzerland", "denmark", "norway", "finland", "belgium", "austria", "portugal", "ireland",
    "israel", "korea", "south korea", "republic of korea", "singapore", "hong kong", "taiwan",
    "new zealand", "mexico", "poland", "russia", "south africa", "argentina", "chile", "greece",
    "turkey", "iran", "egypt",
];

/// Classifies affiliation strings against a [`Lexicon`].
///
/// Stateless apart from its configuration, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct AffiliationClassifier {
    lexicon: Lexicon,
    precedence: AcademicPrecedence,
}

impl Default for AffiliationClassifier {
    fn default() -> Self {
        Self::new(Lexicon::builtin(), AcademicPrecedence::default())
    }
}

impl AffiliationClassifier {
    pub fn new(lexicon: Lexicon, precedence: AcademicPrecedence) -> Self {
        Self {
            lexicon,
            precedence,
        }
    }

    pub fn precedence(&self) -> AcademicPrecedence {
        self.precedence
    }

    /// Classify one affiliation string. Never fails: text without any
    /// keyword is [`Classification::Unknown`].
    pub fn classify(&self, affiliation: &str) -> Verdict {
        let chunks: Vec<(String, Classification)> = affiliation
            .split(';')
            .map(clean_chunk)
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| {
                let class = self.classify_chunk(&chunk);
                (chunk, class)
            })
            .collect();

        let any = |wanted: Classification| chunks.iter().any(|(_, c)| *c == wanted);
        let classification = match self.precedence {
            AcademicPrecedence::AnyChunk if any(Classification::Academic) => Classification::Academic,
            _ if any(Classification::NonAcademic) => Classification::NonAcademic,
            _ if any(Classification::Academic) => Classification::Academic,
            _ => Classification::Unknown,
        };
        if classification != Classification::NonAcademic {
            return Verdict::of(classification);
        }

        let organization = chunks
            .iter()
            .find(|(_, c)| *c == Classification::NonAcademic)
            .map(|(chunk, _)| self.organization_name(chunk));
        Verdict {
            classification,
            organization,
        }
    }

    /// Verdict for a single institution mention. Academic evidence wins
    /// within a chunk.
    pub fn classify_chunk(&self, chunk: &str) -> Classification {
        if self.lexicon.matches(chunk, Category::Academic) {
            Classification::Academic
        } else if self.lexicon.matches(chunk, Category::NonAcademic) {
            Classification::NonAcademic
        } else {
            Classification::Unknown
        }
    }

    /// Best-effort company name from one non-academic chunk.
    ///
    /// Trailing address parts (postal codes, region codes, countries) are
    /// dropped; the segment carrying the industry keyword is kept together
    /// with neighbouring bare legal-form segments (`Genentech, Inc.`).
    /// The leading segment is only used when no segment carries a keyword,
    /// so a department prefix such as `Discovery Chemistry, Merck & Co., Inc.`
    /// yields `Merck & Co., Inc.`.
    pub fn organization_name(&self, chunk: &str) -> String {
        let mut segments: Vec<&str> = chunk
            .trim()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        while segments.last().is_some_and(|s| is_address_tail(s)) {
            segments.pop();
        }
        if segments.is_empty() {
            return chunk.to_string();
        }

        let keyed = segments
            .iter()
            .position(|s| self.lexicon.matches(s, Category::NonAcademic))
            .unwrap_or(0);
        let mut start = keyed;
        while start > 0 && is_legal_suffix(segments[start]) {
            start -= 1;
        }
        let mut end = keyed;
        while end + 1 < segments.len() && is_legal_suffix(segments[end + 1]) {
            end += 1;
        }

        segments[start..=end].join(", ")
    }
}

/// Drop email tokens and the `Electronic address:` phrase.
fn clean_chunk(chunk: &str) -> String {
    let without_emails: Vec<&str> = chunk
        .split_whitespace()
        .filter(|token| !is_email(token.trim_matches(|c: char| !c.is_alphanumeric())))
        .collect();
    let mut cleaned = without_emails.join(" ");

    if let Some(pos) = cleaned.to_ascii_lowercase().find(ELECTRONIC_ADDRESS) {
        cleaned.replace_range(pos..pos + ELECTRONIC_ADDRESS.len(), "");
    }
    cleaned.trim().to_string()
}

fn normalized(segment: &str) -> String {
    segment.trim().trim_end_matches('.').trim().to_ascii_lowercase()
}

fn is_legal_suffix(segment: &str) -> bool {
    LEGAL_SUFFIXES.contains(&normalized(segment).as_str())
}

fn is_country(segment: &str) -> bool {
    COUNTRIES.contains(&normalized(segment).as_str())
}

/// `10017`, `D-69120`, `SW1A 2AA`
fn is_postal_code(segment: &str) -> bool {
    let segment = segment.trim().trim_end_matches('.');
    !segment.is_empty()
        && segment.len() <= 10
        && segment.split_whitespace().count() <= 2
        && segment.chars().any(|c| c.is_ascii_digit())
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
}

/// `NY`, `CA 94080`
fn is_region_code(segment: &str) -> bool {
    let segment = segment.trim().trim_end_matches('.');
    let (code, rest) = segment.split_once(' ').unwrap_or((segment, ""));
    code.len() == 2
        && code.chars().all(|c| c.is_ascii_uppercase())
        && (rest.is_empty() || is_postal_code(rest))
}

fn is_address_tail(segment: &str) -> bool {
    is_country(segment) || is_postal_code(segment) || is_region_code(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(precedence: AcademicPrecedence) -> AffiliationClassifier {
        AffiliationClassifier::new(Lexicon::builtin(), precedence)
    }

    #[test]
    fn pfizer_example() {
        let verdict = AffiliationClassifier::default()
            .classify("Pfizer Inc., 235 East 42nd Street, New York, NY 10017, USA");
        assert_eq!(verdict.classification, Classification::NonAcademic);
        assert_eq!(verdict.organization.as_deref(), Some("Pfizer Inc."));
    }

    #[test]
    fn stanford_example() {
        let verdict = AffiliationClassifier::default()
            .classify("Department of Biology, Stanford University, Stanford, CA, USA");
        assert_eq!(verdict.classification, Classification::Academic);
        assert_eq!(verdict.organization, None);
    }

    #[test]
    fn no_keywords_is_unknown() {
        let verdict = AffiliationClassifier::default().classify("Boston, MA, USA");
        assert_eq!(verdict, Verdict::of(Classification::Unknown));
        assert_eq!(
            AffiliationClassifier::default().classify("").classification,
            Classification::Unknown
        );
    }

    #[test]
    fn princeton_is_not_a_company() {
        let verdict = AffiliationClassifier::default()
            .classify("Princeton Plasma Physics Lab, Princeton, NJ, USA");
        assert_eq!(verdict.classification, Classification::Unknown);
    }

    #[test]
    fn academic_wins_within_chunk() {
        let c = AffiliationClassifier::default();
        assert_eq!(
            c.classify_chunk("Department of Chemistry, Genentech Inc."),
            Classification::Academic
        );
    }

    #[test]
    fn mixed_affiliation_any_chunk() {
        let verdict = classifier(AcademicPrecedence::AnyChunk)
            .classify("Stanford University; Genentech, Inc.");
        assert_eq!(verdict.classification, Classification::Academic);
        assert_eq!(verdict.organization, None);
    }

    #[test]
    fn mixed_affiliation_all_chunks() {
        let verdict = classifier(AcademicPrecedence::AllChunks)
            .classify("Stanford University; Genentech, Inc.");
        assert_eq!(verdict.classification, Classification::NonAcademic);
        assert_eq!(verdict.organization.as_deref(), Some("Genentech, Inc."));
    }

    #[test]
    fn all_chunks_still_academic_without_industry() {
        let verdict = classifier(AcademicPrecedence::AllChunks)
            .classify("Harvard Medical School; Boston, MA");
        assert_eq!(verdict.classification, Classification::Academic);
    }

    #[test]
    fn email_and_address_phrase_removed() {
        let verdict = AffiliationClassifier::default().classify(
            "Genentech, Inc., South San Francisco, CA 94080, USA. Electronic address: chen@gene.com.",
        );
        assert!(verdict.is_non_academic());
        assert_eq!(verdict.organization.as_deref(), Some("Genentech, Inc."));
    }

    #[test]
    fn email_domain_does_not_count_as_keyword() {
        // "inc" inside an address must not classify the chunk
        let verdict = AffiliationClassifier::default().classify("Boston, MA. Electronic address: a@inc.com");
        assert_eq!(verdict.classification, Classification::Unknown);
    }

    #[test]
    fn organization_joins_trailing_legal_forms() {
        let c = AffiliationClassifier::default();
        assert_eq!(
            c.organization_name("Discovery Chemistry, Merck & Co., Inc., Rahway, NJ, USA"),
            "Merck & Co., Inc."
        );
        assert_eq!(
            c.organization_name("Shanghai Acme Pharmaceutical Co., Ltd., Shanghai, China"),
            "Shanghai Acme Pharmaceutical Co., Ltd."
        );
    }

    #[test]
    fn biotechnology_company_is_non_academic() {
        let verdict = AffiliationClassifier::default().classify("Acme Biotechnology Co., Shanghai, China");
        assert_eq!(verdict.classification, Classification::NonAcademic);
        assert_eq!(verdict.organization.as_deref(), Some("Acme Biotechnology Co."));
    }

    #[test]
    fn biotechnology_department_stays_academic() {
        let verdict = AffiliationClassifier::default()
            .classify("Department of Biotechnology, Delft University of Technology, Delft, Netherlands");
        assert_eq!(verdict.classification, Classification::Academic);
    }

    #[test]
    fn organization_falls_back_to_leading_segment() {
        let c = AffiliationClassifier::default();
        assert_eq!(c.organization_name("Acme Widgets, Berlin, Germany"), "Acme Widgets");
    }

    #[test]
    fn organization_falls_back_to_chunk() {
        let c = AffiliationClassifier::default();
        assert_eq!(c.organization_name("USA"), "USA");
    }

    #[test]
    fn address_tail_detection() {
        assert!(is_postal_code("10017"));
        assert!(is_postal_code("D-69120"));
        assert!(is_postal_code("SW1A 2AA"));
        assert!(!is_postal_code("235 East 42nd Street"));
        assert!(is_region_code("NY 10017"));
        assert!(is_region_code("CA"));
        assert!(!is_region_code("Inc."));
        assert!(is_country("USA."));
        assert!(is_country("United Kingdom"));
        assert!(!is_country("New York"));
    }

    #[test]
    fn precedence_from_str() {
        assert_eq!("any-chunk".parse::<AcademicPrecedence>(), Ok(AcademicPrecedence::AnyChunk));
        assert_eq!("all-chunks".parse::<AcademicPrecedence>(), Ok(AcademicPrecedence::AllChunks));
        assert!("strict".parse::<AcademicPrecedence>().is_err());
        assert_eq!(AcademicPrecedence::AllChunks.to_string(), "all-chunks");
    }
}
