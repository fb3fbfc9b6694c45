//! CSV output of the filtered papers

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use paperlist_core::Paper;

pub const HEADER: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator for list-valued columns
const LIST_SEPARATOR: &str = "; ";

fn row(paper: &Paper) -> [String; 6] {
    [
        paper.pubmed_id.clone(),
        paper.title.clone(),
        paper.publication_date.clone(),
        paper.non_academic_authors.join(LIST_SEPARATOR),
        paper.company_affiliations.join(LIST_SEPARATOR),
        paper.corresponding_email.clone().unwrap_or_default(),
    ]
}

/// Write the header and one row per paper. The header is written even
/// when `papers` is empty.
pub fn write_csv<W: Write>(writer: W, papers: &[Paper]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for paper in papers {
        csv.write_record(row(paper))
            .with_context(|| format!("Failed to write row for PMID {}", paper.pubmed_id))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write to `path` (created or truncated), or to stdout when `None`.
pub fn write_table(path: Option<&Path>, papers: &[Paper]) -> Result<()> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(std::io::BufWriter::new(file), papers)?;
            log::info!("Wrote {} rows to {}", papers.len(), path.display());
        }
        None => write_csv(std::io::stdout().lock(), papers)?,
    }
    Ok(())
}
