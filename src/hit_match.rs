// src/hit_match.rs

use ahash::AHashMap;
use rayon::prelude::*;
use std::path::Path;

use crate::errors::ToxError;
use crate::table::{strip_header_comment, Table};

/// Query-sequence identifier column in the homology table.
pub const QSEQID_COLUMN: &str = "qseqid";

/// Contig identifier column in the prediction table.
pub const CONTIG_COLUMN: &str = "contig";

/// Exact join key between predictions and the expanded table.
pub const ID_COLUMN: &str = "ID";

/// Output of one Hit Matcher run: the row-expanded intermediate and the
/// final left-joined table.
pub struct MatchResults {
    pub expanded: Table,
    pub merged: Table,
}

/// Runs the full matching stage.
///
/// The homology file's first line may carry a leading '#'; a de-commented
/// working copy is written to `working_path` before parsing so the source
/// file is never modified. The caller overwrites `working_path` with the
/// expanded table afterwards, keeping the on-disk flow of a batch run.
pub fn match_hits<P, Q, R>(
    hits_path: P,
    predictions_path: Q,
    working_path: R,
) -> Result<MatchResults, ToxError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    strip_header_comment(&hits_path, &working_path)?;
    let hits = Table::read_tsv(&working_path)?;
    let predictions = Table::read_tsv(&predictions_path)?;
    log::info!(
        "matching {} predictions against {} homology hits",
        predictions.rows.len(),
        hits.rows.len()
    );

    let expanded = expand_predictions(&hits, &predictions)?;
    let merged = merge_with_predictions(&predictions, &expanded)?;
    Ok(MatchResults { expanded, merged })
}

/// Expands each prediction row into one row per homology hit whose
/// `qseqid` contains the prediction's `contig` value as a substring.
/// Output rows carry the hit's fields first, then the prediction's.
///
/// Each prediction is one independent unit of work; the hit table is
/// shared read-only across the pool. `collect` on an indexed parallel
/// iterator returns results in submission order, so output ordering is
/// deterministic across runs: by prediction row, then by hit row.
pub fn expand_predictions(hits: &Table, predictions: &Table) -> Result<Table, ToxError> {
    let qseqid_idx = hits
        .column_index(QSEQID_COLUMN)
        .ok_or_else(|| ToxError::MissingColumn(QSEQID_COLUMN.to_string()))?;
    let contig_idx = predictions
        .column_index(CONTIG_COLUMN)
        .ok_or_else(|| ToxError::MissingColumn(CONTIG_COLUMN.to_string()))?;

    let mut columns = hits.columns.clone();
    columns.extend(predictions.columns.iter().cloned());

    let per_prediction: Vec<Vec<Vec<String>>> = predictions
        .rows
        .par_iter()
        .map(|prediction| {
            let contig = predictions.field(prediction, contig_idx);
            // a row without a contig value matches nothing
            if contig.is_empty() {
                return Vec::new();
            }
            let mut matched = Vec::new();
            for hit in &hits.rows {
                let qseqid = hits.field(hit, qseqid_idx);
                // empty qseqid is a missing value, never a match
                if qseqid.is_empty() || !qseqid.contains(contig) {
                    continue;
                }
                let mut row = hits.padded(hit);
                row.extend(predictions.padded(prediction));
                matched.push(row);
            }
            matched
        })
        .collect();

    let rows: Vec<Vec<String>> = per_prediction.into_iter().flatten().collect();
    log::info!("expansion produced {} matched rows", rows.len());

    Ok(Table { columns, rows })
}

/// Left-joins the prediction table against the expanded table on exact
/// `ID` equality. The expanded table is truncated to its columns up
/// through `ID` inclusive; truncated columns that repeat a prediction
/// column are dropped (they were copied from the same prediction row and
/// carry identical values). Every prediction row survives; rows without a
/// match carry empty homology fields.
pub fn merge_with_predictions(
    predictions: &Table,
    expanded: &Table,
) -> Result<Table, ToxError> {
    let expanded_id_idx = expanded
        .column_index(ID_COLUMN)
        .ok_or_else(|| ToxError::MissingColumn(ID_COLUMN.to_string()))?;
    let prediction_id_idx = predictions
        .column_index(ID_COLUMN)
        .ok_or_else(|| ToxError::MissingColumn(ID_COLUMN.to_string()))?;

    let kept: Vec<usize> = (0..=expanded_id_idx)
        .filter(|&i| predictions.column_index(&expanded.columns[i]).is_none())
        .collect();

    let mut by_id: AHashMap<&str, Vec<&Vec<String>>> = AHashMap::new();
    for row in &expanded.rows {
        by_id
            .entry(expanded.field(row, expanded_id_idx))
            .or_default()
            .push(row);
    }

    let mut columns = predictions.columns.clone();
    columns.extend(kept.iter().map(|&i| expanded.columns[i].clone()));

    let mut rows = Vec::with_capacity(predictions.rows.len());
    for prediction in &predictions.rows {
        let id = predictions.field(prediction, prediction_id_idx);
        match by_id.get(id) {
            Some(matches) => {
                for matched in matches {
                    let mut row = predictions.padded(prediction);
                    row.extend(
                        kept.iter()
                            .map(|&i| expanded.field(matched, i).to_string()),
                    );
                    rows.push(row);
                }
            }
            None => {
                let mut row = predictions.padded(prediction);
                row.extend(kept.iter().map(|_| String::new()));
                rows.push(row);
            }
        }
    }

    Ok(Table { columns, rows })
}
