// src/table.rs

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::ToxError;

/// An in-memory tab-separated table with a header row.
///
/// Every field is carried verbatim as its source text: numbers and
/// booleans stringify exactly as written in the input file, and a field
/// absent from a short row is the empty string. The empty string is the
/// single missing-value sentinel throughout the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Reads a tab-separated file with a header line. Paths ending in
    /// ".gz" are transparently gunzipped.
    pub fn read_tsv<P: AsRef<Path>>(path: P) -> Result<Table, ToxError> {
        let path_str = path.as_ref().display().to_string();
        let f = File::open(&path).map_err(|source| ToxError::Read {
            path: path_str.clone(),
            source,
        })?;

        let is_gz = path
            .as_ref()
            .extension()
            .map(|ext| ext == "gz")
            .unwrap_or(false);

        let reader: Box<dyn BufRead> = if is_gz {
            Box::new(BufReader::new(MultiGzDecoder::new(f)))
        } else {
            Box::new(BufReader::new(f))
        };

        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line.map_err(|source| ToxError::Read {
                path: path_str.clone(),
                source,
            })?,
            None => return Err(ToxError::EmptyTable { path: path_str }),
        };

        let columns: Vec<String> = header
            .trim_end_matches(['\r', '\n'])
            .split('\t')
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for line in lines {
            let line = line.map_err(|source| ToxError::Read {
                path: path_str.clone(),
                source,
            })?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            rows.push(line.split('\t').map(str::to_string).collect());
        }

        log::debug!("read {} rows from '{}'", rows.len(), path_str);
        Ok(Table { columns, rows })
    }

    /// Writes the table back out as tab-separated text with a header.
    pub fn write_tsv<P: AsRef<Path>>(&self, path: P) -> Result<(), ToxError> {
        let path_str = path.as_ref().display().to_string();
        let wrap = |source| ToxError::Write {
            path: path_str.clone(),
            source,
        };

        let f = File::create(&path).map_err(wrap)?;
        let mut w = BufWriter::new(f);
        writeln!(w, "{}", self.columns.join("\t")).map_err(wrap)?;
        for row in &self.rows {
            writeln!(w, "{}", self.padded(row).join("\t")).map_err(wrap)?;
        }
        w.flush().map_err(wrap)
    }

    /// Index of an exactly-named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column matched case- and whitespace-insensitively.
    pub fn column_index_ci(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.columns
            .iter()
            .position(|c| c.trim().to_lowercase() == wanted)
    }

    /// Field at (row, col), with short rows reading as empty string.
    pub fn field<'a>(&'a self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }

    /// A row brought up to full header width, missing fields as "".
    pub fn padded(&self, row: &[String]) -> Vec<String> {
        let mut out = row.to_vec();
        out.resize(self.columns.len(), String::new());
        out
    }
}

/// Writes pre-rendered table text to a file, wrapping the failure with
/// the path.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<(), ToxError> {
    std::fs::write(&path, text).map_err(|source| ToxError::Write {
        path: path.as_ref().display().to_string(),
        source,
    })
}

/// Copies `src` to `dst` with a single leading '#' stripped from the first
/// line, if present. BLASTp outfmt6 headers arrive commented out; the
/// original input file is left untouched and `dst` becomes the working
/// copy that gets parsed.
pub fn strip_header_comment<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
) -> Result<(), ToxError> {
    let src_str = src.as_ref().display().to_string();
    let dst_str = dst.as_ref().display().to_string();

    let f = File::open(&src).map_err(|source| ToxError::Read {
        path: src_str.clone(),
        source,
    })?;
    let reader = BufReader::new(f);

    let out = File::create(&dst).map_err(|source| ToxError::Write {
        path: dst_str.clone(),
        source,
    })?;
    let mut w = BufWriter::new(out);

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ToxError::Read {
            path: src_str.clone(),
            source,
        })?;
        let line = if i == 0 {
            line.strip_prefix('#').unwrap_or(&line).to_string()
        } else {
            line
        };
        writeln!(w, "{}", line).map_err(|source| ToxError::Write {
            path: dst_str.clone(),
            source,
        })?;
    }
    w.flush().map_err(|source| ToxError::Write {
        path: dst_str,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as IoWrite;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_header_and_rows() {
        let f = write_file("a\tb\tc\n1\t2\t3\nx\ty\tz\n");
        let t = Table::read_tsv(f.path()).unwrap();
        assert_eq!(t.columns, vec!["a", "b", "c"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["x", "y", "z"]);
    }

    #[test]
    fn short_rows_read_as_empty_fields() {
        let f = write_file("a\tb\tc\n1\t2\n");
        let t = Table::read_tsv(f.path()).unwrap();
        assert_eq!(t.field(&t.rows[0], 2), "");
        assert_eq!(t.padded(&t.rows[0]), vec!["1", "2", ""]);
    }

    #[test]
    fn empty_file_is_not_a_table() {
        let f = write_file("");
        let err = Table::read_tsv(f.path()).unwrap_err();
        assert!(matches!(err, ToxError::EmptyTable { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Table::read_tsv("no/such/file.tsv").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no/such/file.tsv"), "got: {}", msg);
    }

    #[test]
    fn strips_only_first_line_comment() {
        let src = write_file("#qseqid\tsseqid\nread_1\tP1\n#not a header\n");
        let dst = NamedTempFile::new().unwrap();
        strip_header_comment(src.path(), dst.path()).unwrap();

        let text = std::fs::read_to_string(dst.path()).unwrap();
        assert_eq!(text, "qseqid\tsseqid\nread_1\tP1\n#not a header\n");
        // source untouched
        let orig = std::fs::read_to_string(src.path()).unwrap();
        assert!(orig.starts_with('#'));
    }

    #[test]
    fn uncommented_header_passes_through() {
        let src = write_file("qseqid\tsseqid\nread_1\tP1\n");
        let dst = NamedTempFile::new().unwrap();
        strip_header_comment(src.path(), dst.path()).unwrap();
        let text = std::fs::read_to_string(dst.path()).unwrap();
        assert_eq!(text, "qseqid\tsseqid\nread_1\tP1\n");
    }

    #[test]
    fn write_then_read_round_trip_pads_short_rows() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.rows.push(vec!["1".into()]);
        let f = NamedTempFile::new().unwrap();
        t.write_tsv(f.path()).unwrap();
        let back = Table::read_tsv(f.path()).unwrap();
        assert_eq!(back.rows[0], vec!["1", ""]);
    }
}
