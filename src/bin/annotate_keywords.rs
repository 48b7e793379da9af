use toxmatch_rs::errors::ToxError;
use toxmatch_rs::keywords::{annotate, KeywordSet};
use toxmatch_rs::table::Table;

const DATA_PATH: &str = "combined_output.tsv";
const TOXIN_KEYWORDS_PATH: &str = "toxins_keywords.csv";
const DOMAIN_KEYWORDS_PATH: &str = "ToxProt_domain_Keywords.tsv";
const OUTPUT_PATH: &str = "combined_output_keywords.tsv";

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("annotate-keywords: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ToxError> {
    let toxin_keywords = KeywordSet::load(TOXIN_KEYWORDS_PATH)?;
    let domain_keywords = KeywordSet::load(DOMAIN_KEYWORDS_PATH)?;

    let data = Table::read_tsv(DATA_PATH)?;
    let annotated = annotate(&data, &toxin_keywords, &domain_keywords)?;
    annotated.write_tsv(OUTPUT_PATH)?;
    println!("Updated data saved to '{}'.", OUTPUT_PATH);
    Ok(())
}
