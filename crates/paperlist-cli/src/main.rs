//! get-papers-list - PubMed papers with industry-affiliated authors
//!
//! Runs a PubMed query, parses every returned record, keeps the papers with
//! at least one non-academic (company) author and writes them as CSV.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use paperlist_classify::{AcademicPrecedence, PaperFilter};
use paperlist_core::{ProgressContext, SharedProgress, fmt_num};
use paperlist_pubmed::{Collection, PubmedClient, collect};

mod config;
mod table;

use config::{ClientOverrides, Config};

#[derive(Parser)]
#[command(name = "get-papers-list")]
#[command(about = "List PubMed papers with at least one author from a pharmaceutical or biotech company")]
#[command(version)]
struct Cli {
    /// PubMed query (full PubMed search syntax)
    query: String,

    /// Write CSV to this file instead of stdout
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable debug logging and print a run summary
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ./paperlist.toml or ~/.config/paperlist/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Contact email sent to NCBI (overrides config and NCBI_EMAIL)
    #[arg(long)]
    email: Option<String>,

    /// NCBI API key (overrides config and NCBI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum number of PubMed IDs to retrieve
    #[arg(long)]
    max_results: Option<usize>,

    /// How mixed academic/industry affiliations are classified
    #[arg(long, value_name = "any-chunk|all-chunks")]
    precedence: Option<AcademicPrecedence>,

    /// Maximum retry attempts for transient failures
    #[arg(long)]
    max_retries: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress: SharedProgress = Arc::new(ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, the spinner shows activity
    //   non-TTY: info unless --debug
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    paperlist_core::init_logging(quiet, cli.debug, multi);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    paperlist_core::set_http_config(config.http.to_http_config(cli.max_retries));

    let client_config = config.pubmed.to_client_config(ClientOverrides {
        email: cli.email,
        api_key: cli.api_key,
        max_results: cli.max_results,
    });
    if client_config.email.is_none() {
        log::warn!("No contact email configured; NCBI asks for one (--email or NCBI_EMAIL)");
    }
    let filter = PaperFilter::new(config.classifier.build(cli.precedence));

    if cli.debug {
        progress.println(format!("Query:  {}", cli.query));
        progress.println(format!(
            "Output: {}",
            cli.file
                .as_ref()
                .map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
        ));
    }

    let client = PubmedClient::new(client_config);
    let collection = collect(&client, &cli.query, &progress)?;
    if collection.is_total_failure() {
        bail!(
            "Found {} PubMed IDs but no record could be fetched and parsed",
            collection.ids.len()
        );
    }

    let papers = filter.filter(&collection.papers);
    table::write_table(cli.file.as_deref(), &papers)?;

    if cli.debug {
        print_summary(&collection, papers.len(), filter.classifier().precedence());
    }
    Ok(())
}

fn print_summary(collection: &Collection, retained: usize, precedence: AcademicPrecedence) {
    let rows = [
        ("IDs found", fmt_num(collection.ids.len())),
        ("Records parsed", fmt_num(collection.papers.len())),
        ("Fetch failures", fmt_num(collection.fetch_failures)),
        ("Parse failures", fmt_num(collection.parse_failures)),
        ("Papers retained", fmt_num(retained)),
        ("Precedence", precedence.to_string()),
    ];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Summary").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}
