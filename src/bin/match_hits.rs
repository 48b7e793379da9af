use indicatif::{ProgressBar, ProgressStyle};

use toxmatch_rs::errors::ToxError;
use toxmatch_rs::hit_match::match_hits;

const HITS_PATH: &str = "blastp.outfmt6.w_pct_hit_length";
const PREDICTIONS_PATH: &str = "DeTox_output_toxins.tsv";
const MATCHED_PATH: &str = "matched_content.tsv";
const COMBINED_PATH: &str = "combined_output.tsv";

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("match-hits: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ToxError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message("Matching predictions against homology hits...");

    let results = match_hits(HITS_PATH, PREDICTIONS_PATH, MATCHED_PATH)?;
    println!(
        "Homology hit file has been processed and saved as '{}'.",
        MATCHED_PATH
    );
    spinner.finish_with_message(format!(
        "Matched {} prediction/hit pairs.",
        results.expanded.rows.len()
    ));

    results.expanded.write_tsv(MATCHED_PATH)?;
    println!("Matched data saved to '{}'.", MATCHED_PATH);

    results.merged.write_tsv(COMBINED_PATH)?;
    println!("Combined data saved to '{}'.", COMBINED_PATH);
    Ok(())
}
