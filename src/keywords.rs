// src/keywords.rs

use ahash::AHashSet;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::ToxError;
use crate::table::Table;

/// Domain-annotation column tested by the scoped keyword check.
pub const PFAM_DOMAINS_COLUMN: &str = "pfam domains";

/// Evidence columns appended by annotation.
pub const TOXIN_KEYWORDS_COLUMN: &str = "toxin_keywords";
pub const PFAM_KEYWORDS_COLUMN: &str = "pfam_ToxinKeywords";

/// A set of lowercased, trimmed keywords with a compiled whole-word
/// matcher. Terms are matched as literal text: regex metacharacters are
/// escaped before the alternation pattern is built, and the escaped terms
/// are sorted so the compiled pattern is identical across runs.
pub struct KeywordSet {
    terms: AHashSet<String>,
    matcher: Option<Regex>,
}

impl KeywordSet {
    /// Loads keywords from a one-column file. No header is assumed, so
    /// every line contributes a term; lines are trimmed, lowercased, and
    /// deduplicated. Multi-column lines contribute their first column.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<KeywordSet, ToxError> {
        let path_str = path.as_ref().display().to_string();
        let f = File::open(&path).map_err(|source| ToxError::Read {
            path: path_str.clone(),
            source,
        })?;
        let reader = BufReader::new(f);

        let mut terms = AHashSet::new();
        for line in reader.lines() {
            let line = line.map_err(|source| ToxError::Read {
                path: path_str.clone(),
                source,
            })?;
            let term = line
                .split('\t')
                .next()
                .unwrap_or("")
                .trim()
                .to_lowercase();
            if !term.is_empty() {
                terms.insert(term);
            }
        }

        log::info!("loaded {} keywords from '{}'", terms.len(), path_str);
        Ok(KeywordSet::from_terms(terms))
    }

    fn from_terms(terms: AHashSet<String>) -> KeywordSet {
        let matcher = if terms.is_empty() {
            None
        } else {
            let mut escaped: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
            escaped.sort();
            let pattern = format!(r"\b(?:{})\b", escaped.join("|"));
            Some(Regex::new(&pattern).unwrap())
        };
        KeywordSet { terms, matcher }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if any keyword occurs in `text` as a whole word,
    /// case-insensitively.
    pub fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Some(re) => re.is_match(&text.to_lowercase()),
            None => false,
        }
    }
}

/// Appends the two evidence columns to a merged table.
///
/// `toxin_keywords` tests the free keyword set against the whole row: all
/// fields joined with single spaces, short rows padded with empty fields.
/// `pfam_ToxinKeywords` tests the domain-token set against the
/// `pfam domains` column only; an empty value there simply never matches.
/// Both results are written as literal "TRUE"/"FALSE" tokens. Rows pass
/// through 1:1 with their column order preserved.
pub fn annotate(
    table: &Table,
    toxin_keywords: &KeywordSet,
    domain_keywords: &KeywordSet,
) -> Result<Table, ToxError> {
    let pfam_idx = table
        .column_index(PFAM_DOMAINS_COLUMN)
        .ok_or_else(|| ToxError::MissingColumn(PFAM_DOMAINS_COLUMN.to_string()))?;

    let mut columns = table.columns.clone();
    columns.push(TOXIN_KEYWORDS_COLUMN.to_string());
    columns.push(PFAM_KEYWORDS_COLUMN.to_string());

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut out = table.padded(row);

        let combined = out.join(" ");
        let full_row_hit = toxin_keywords.matches(&combined);
        let domain_hit = domain_keywords.matches(table.field(row, pfam_idx));

        out.push(flag(full_row_hit));
        out.push(flag(domain_hit));
        rows.push(out);
    }

    Ok(Table { columns, rows })
}

fn flag(hit: bool) -> String {
    if hit { "TRUE" } else { "FALSE" }.to_string()
}
