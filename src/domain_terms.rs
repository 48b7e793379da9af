// src/domain_terms.rs

use ahash::AHashSet;
use regex::Regex;
use std::fmt::Write as FmtWrite;

use crate::errors::ToxError;
use crate::table::Table;

/// Matches one `PF<digits>; <name>;` entry and captures the name.
const PFAM_ENTRY_PATTERN: &str = r"PF\d+; ([^;]+);";

/// Aggregated result of one extraction pass over a taxonomy export.
///
/// All aggregation state is local to the pass and returned here; nothing
/// is accumulated in module-level collections.
#[derive(Debug, Clone)]
pub struct DomainTermSummary {
    /// Unique captured domain names, in first-seen order.
    pub unique_terms: Vec<String>,
    /// Input rows scanned (whether or not they yielded a capture).
    pub rows_analyzed: usize,
    /// Total captures including duplicates.
    pub terms_extracted: usize,
}

impl DomainTermSummary {
    pub fn unique_count(&self) -> usize {
        self.unique_terms.len()
    }

    /// `terms_extracted = duplicates + unique_count` by construction.
    pub fn duplicate_count(&self) -> usize {
        self.terms_extracted - self.unique_terms.len()
    }

    /// One-column unique-term table text.
    pub fn get_terms_table(&self) -> String {
        let mut output = String::from("Unique Terms\n");
        for term in &self.unique_terms {
            writeln!(output, "{}", term).unwrap();
        }
        output
    }

    /// Two-column statistics table text.
    pub fn get_stats_table(&self) -> String {
        let mut output = String::from("Statistic\tValue\n");
        writeln!(output, "Total Lines Analyzed\t{}", self.rows_analyzed).unwrap();
        writeln!(output, "Number of Terms Extracted\t{}", self.terms_extracted).unwrap();
        writeln!(output, "Number of Duplicates\t{}", self.duplicate_count()).unwrap();
        writeln!(output, "Number of Unique Values\t{}", self.unique_count()).unwrap();
        output
    }
}

/// Scans the export's "pfam" column (located case- and whitespace-
/// insensitively) and collects every captured domain name. Cells without
/// a value are scanned as empty text and yield nothing.
pub fn extract_domain_terms(export: &Table) -> Result<DomainTermSummary, ToxError> {
    let pfam_idx = export
        .column_index_ci("pfam")
        .ok_or_else(|| ToxError::MissingColumn("pfam".to_string()))?;
    log::info!(
        "using column '{}' for Pfam annotations",
        export.columns[pfam_idx]
    );

    let pattern = Regex::new(PFAM_ENTRY_PATTERN).unwrap();

    let mut seen: AHashSet<String> = AHashSet::new();
    let mut unique_terms = Vec::new();
    let mut terms_extracted = 0usize;

    for row in &export.rows {
        let cell = export.field(row, pfam_idx);
        for caps in pattern.captures_iter(cell) {
            let term = caps[1].to_string();
            terms_extracted += 1;
            if seen.insert(term.clone()) {
                unique_terms.push(term);
            }
        }
    }

    log::info!(
        "extracted {} terms ({} unique) from {} rows",
        terms_extracted,
        unique_terms.len(),
        export.rows.len()
    );

    Ok(DomainTermSummary {
        unique_terms,
        rows_analyzed: export.rows.len(),
        terms_extracted,
    })
}
