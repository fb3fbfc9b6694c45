//! Bibliographic record model

/// One listed author of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Display name (full name when the record has one, short form otherwise)
    pub name: String,
    /// Raw affiliation text; several `AD` blocks are joined with `"; "`
    pub affiliation: String,
    pub is_corresponding: bool,
    /// Contact email, only set for corresponding authors
    pub email: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = affiliation.into();
        self
    }
}

/// A parsed record plus the fields derived by the paper filter.
///
/// `pubmed_id`, `title`, `publication_date` and `authors` come from the
/// record parser and are not touched afterwards. The three derived fields
/// stay empty until the filter produces a retained copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paper {
    pub pubmed_id: String,
    pub title: String,
    /// As given by the source (`2024`, `2024 Mar`, `2024 Mar 5`), not normalized
    pub publication_date: String,
    pub authors: Vec<Author>,

    // Derived
    pub non_academic_authors: Vec<String>,
    pub company_affiliations: Vec<String>,
    pub corresponding_email: Option<String>,
}

impl Paper {
    pub fn new(pubmed_id: impl Into<String>) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            ..Default::default()
        }
    }

    /// First corresponding author carrying a non-empty email.
    pub fn corresponding_author(&self) -> Option<&Author> {
        self.authors.iter().find(|a| {
            a.is_corresponding && a.email.as_deref().is_some_and(|e| !e.is_empty())
        })
    }

    /// Whether any derived field has been populated.
    #[cfg(test)]
    fn is_derived(&self) -> bool {
        !self.non_academic_authors.is_empty()
            || !self.company_affiliations.is_empty()
            || self.corresponding_email.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corresponding(name: &str, email: Option<&str>) -> Author {
        Author {
            name: name.to_string(),
            is_corresponding: true,
            email: email.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn new_paper_has_no_derived_fields() {
        let paper = Paper::new("12345");
        assert_eq!(paper.pubmed_id, "12345");
        assert!(paper.title.is_empty());
        assert!(!paper.is_derived());
    }

    #[test]
    fn corresponding_author_skips_missing_email() {
        let mut paper = Paper::new("1");
        paper.authors = vec![
            Author::new("Plain Author"),
            corresponding("No Mail", None),
            corresponding("Empty Mail", Some("")),
            corresponding("Has Mail", Some("has@corp.com")),
        ];
        let author = paper.corresponding_author().unwrap();
        assert_eq!(author.name, "Has Mail");
    }

    #[test]
    fn corresponding_author_none() {
        let mut paper = Paper::new("1");
        paper.authors = vec![Author::new("A").with_affiliation("Pfizer Inc.")];
        assert!(paper.corresponding_author().is_none());
    }
}
