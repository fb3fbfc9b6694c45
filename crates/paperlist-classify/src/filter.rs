//! Paper filter: keep papers with at least one non-academic author

use paperlist_core::Paper;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::classifier::AffiliationClassifier;

/// Selects papers with industry authors and fills their derived fields.
#[derive(Debug, Clone, Default)]
pub struct PaperFilter {
    classifier: AffiliationClassifier,
}

impl PaperFilter {
    pub fn new(classifier: AffiliationClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &AffiliationClassifier {
        &self.classifier
    }

    /// Retained papers, in input order, as new values.
    ///
    /// Derived fields are recomputed from the authors, so filtering an
    /// already filtered set yields the same set.
    pub fn filter(&self, papers: &[Paper]) -> Vec<Paper> {
        let retained: Vec<Paper> = papers.par_iter().filter_map(|p| self.derive(p)).collect();
        log::debug!(
            "Filter retained {}/{} papers",
            retained.len(),
            papers.len()
        );
        retained
    }

    /// Derived copy of `paper`, or `None` when no author is non-academic.
    pub fn derive(&self, paper: &Paper) -> Option<Paper> {
        let mut non_academic_authors = Vec::new();
        let mut company_affiliations = Vec::new();
        let mut seen = FxHashSet::default();

        for author in &paper.authors {
            let verdict = self.classifier.classify(&author.affiliation);
            if !verdict.is_non_academic() {
                continue;
            }
            non_academic_authors.push(author.name.clone());
            if let Some(org) = verdict.organization.filter(|o| !o.is_empty()) {
                if seen.insert(org.clone()) {
                    company_affiliations.push(org);
                }
            }
        }
        if non_academic_authors.is_empty() {
            return None;
        }

        Some(Paper {
            pubmed_id: paper.pubmed_id.clone(),
            title: paper.title.clone(),
            publication_date: paper.publication_date.clone(),
            authors: paper.authors.clone(),
            non_academic_authors,
            company_affiliations,
            corresponding_email: paper
                .corresponding_author()
                .and_then(|a| a.email.clone()),
        })
    }
}
