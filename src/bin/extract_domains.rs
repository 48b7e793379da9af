use toxmatch_rs::domain_terms::extract_domain_terms;
use toxmatch_rs::errors::ToxError;
use toxmatch_rs::table::{write_text, Table};

/// TSV export of the UniProtKB taxonomy query, carrying a "Pfam" column.
const EXPORT_PATH: &str = "uniprotkb_taxonomy_pfam.tsv";
const TERMS_PATH: &str = "ToxProt_domain_Keywords.tsv";
const STATS_PATH: &str = "ToxProt_domain_Keywords_Stats.tsv";

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("extract-domains: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ToxError> {
    let export = Table::read_tsv(EXPORT_PATH)?;
    println!("File read successfully.");

    let summary = extract_domain_terms(&export)?;

    write_text(TERMS_PATH, &summary.get_terms_table())?;
    println!("Unique domain terms saved to '{}'.", TERMS_PATH);

    write_text(STATS_PATH, &summary.get_stats_table())?;
    println!("Statistics extracted and saved to '{}'.", STATS_PATH);
    Ok(())
}
