// src/lib.rs
pub mod domain_terms;
pub mod errors;
pub mod hit_match;
pub mod keywords;
pub mod table;

use std::path::PathBuf;

use crate::domain_terms::{extract_domain_terms, DomainTermSummary};
use crate::errors::ToxError;
use crate::hit_match::match_hits;
use crate::keywords::{annotate, KeywordSet};
use crate::table::{write_text, Table};

/// Every file path one full pipeline run touches. The three stages are
/// also runnable standalone (see `src/bin/`); this struct exists for the
/// chained run and for tests.
pub struct PipelinePaths {
    /// Taxonomy export with a "pfam" column (inputs).
    pub taxonomy_export: PathBuf,
    pub homology_hits: PathBuf,
    pub predictions: PathBuf,
    pub toxin_keywords: PathBuf,

    /// Stage outputs; `domain_terms` doubles as the second keyword source
    /// and `merged` as the annotator's input.
    pub domain_terms: PathBuf,
    pub domain_stats: PathBuf,
    pub matched: PathBuf,
    pub merged: PathBuf,
    pub annotated: PathBuf,
}

/// Row counts and the extraction summary from one chained run.
pub struct PipelineSummary {
    pub domain_terms: DomainTermSummary,
    pub matched_rows: usize,
    pub merged_rows: usize,
    pub annotated_rows: usize,
}

/// Runs all three stages back to back: extract domain terms from the
/// taxonomy export, match predictions against homology hits, then
/// annotate the merged table with both keyword sets. Each stage writes
/// its outputs only after its computation succeeded, and downstream
/// stages read the files upstream stages wrote, so the on-disk results
/// are byte-identical to running the standalone binaries in order.
pub fn run_pipeline(paths: &PipelinePaths) -> Result<PipelineSummary, ToxError> {
    // 1. Domain-term extraction
    let export = Table::read_tsv(&paths.taxonomy_export)?;
    let summary = extract_domain_terms(&export)?;
    write_text(&paths.domain_terms, &summary.get_terms_table())?;
    write_text(&paths.domain_stats, &summary.get_stats_table())?;

    // 2. Homology hit matching
    let results = match_hits(&paths.homology_hits, &paths.predictions, &paths.matched)?;
    results.expanded.write_tsv(&paths.matched)?;
    results.merged.write_tsv(&paths.merged)?;

    // 3. Keyword annotation over the merged table
    let toxin_keywords = KeywordSet::load(&paths.toxin_keywords)?;
    let domain_keywords = KeywordSet::load(&paths.domain_terms)?;
    let merged = Table::read_tsv(&paths.merged)?;
    let annotated = annotate(&merged, &toxin_keywords, &domain_keywords)?;
    annotated.write_tsv(&paths.annotated)?;

    Ok(PipelineSummary {
        matched_rows: results.expanded.rows.len(),
        merged_rows: results.merged.rows.len(),
        annotated_rows: annotated.rows.len(),
        domain_terms: summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write as IoWrite;

    fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_run_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();

        let taxonomy_export = write_fixture(
            dir.path(),
            "export.tsv",
            "Entry\tPfam\n\
             P01\tPF00001; ToxinDomain; PF00089; Trypsin;\n\
             P02\tPF00001; ToxinDomain;\n\
             P03\t\n",
        );
        let homology_hits = write_fixture(
            dir.path(),
            "blastp.outfmt6",
            "#qseqid\tsseqid\tpident\n\
             contig_42_frame1\tsp|P0C1|TX1\t98.2\n\
             contig_42_frame2\tsp|P0C2|TX2\t64.0\n\
             contig_7_frame0\tsp|P0C3|TX3\t51.5\n",
        );
        let predictions = write_fixture(
            dir.path(),
            "toxins.tsv",
            "contig\tID\tpfam domains\tscore\n\
             contig_42\tT1\tPF00001; ToxinDomain;\t0.91\n\
             contig_9\tT2\t\t0.55\n",
        );
        let toxin_keywords = write_fixture(dir.path(), "keywords.csv", "Toxin\nvenom\n");

        let paths = PipelinePaths {
            taxonomy_export,
            homology_hits,
            predictions,
            toxin_keywords,
            domain_terms: dir.path().join("domain_keywords.tsv"),
            domain_stats: dir.path().join("domain_keywords_stats.tsv"),
            matched: dir.path().join("matched_content.tsv"),
            merged: dir.path().join("combined_output.tsv"),
            annotated: dir.path().join("combined_output_keywords.tsv"),
        };

        let summary = run_pipeline(&paths).expect("pipeline failed");

        // extraction: 3 captures, 2 unique, accounting holds
        assert_eq!(summary.domain_terms.rows_analyzed, 3);
        assert_eq!(summary.domain_terms.terms_extracted, 3);
        assert_eq!(summary.domain_terms.unique_count(), 2);
        assert_eq!(summary.domain_terms.duplicate_count(), 1);
        let terms_text = fs::read_to_string(&paths.domain_terms).unwrap();
        assert_eq!(terms_text, "Unique Terms\nToxinDomain\nTrypsin\n");

        // matching: T1 expands into two hits, T2 survives unmatched
        assert_eq!(summary.matched_rows, 2);
        assert_eq!(summary.merged_rows, 3);
        let merged = Table::read_tsv(&paths.merged).unwrap();
        let ids: Vec<&str> = merged.rows.iter().map(|r| merged.field(r, 1)).collect();
        assert_eq!(ids, vec!["T1", "T1", "T2"]);
        let qseqid_idx = merged.column_index("qseqid").unwrap();
        assert_eq!(merged.field(&merged.rows[2], qseqid_idx), "");

        // annotation: rows conserved, flags as expected
        assert_eq!(summary.annotated_rows, 3);
        let annotated = Table::read_tsv(&paths.annotated).unwrap();
        assert_eq!(annotated.rows.len(), merged.rows.len());
        let tk = annotated.column_index("toxin_keywords").unwrap();
        let pk = annotated.column_index("pfam_ToxinKeywords").unwrap();
        // "ToxinDomain" is one token, so "toxin" never appears as a
        // whole word in T1's row text; the domain column still flags
        assert_eq!(annotated.field(&annotated.rows[0], tk), "FALSE");
        assert_eq!(annotated.field(&annotated.rows[0], pk), "TRUE");
        assert_eq!(annotated.field(&annotated.rows[2], tk), "FALSE");
        assert_eq!(annotated.field(&annotated.rows[2], pk), "FALSE");

        // the homology source file keeps its '#'
        let orig = fs::read_to_string(&paths.homology_hits).unwrap();
        assert!(orig.starts_with('#'));
    }
}
