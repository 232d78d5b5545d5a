//! CSV record parsing and column identification

use log::{debug, warn};

/// Header names (compared case-insensitively) that mark the file identity column
pub const IDENTITY_COLUMN_TOKENS: [&str; 2] = ["compileunits", "filename"];

/// Parsed CSV snapshot: a header row plus data rows of the same width
///
/// # Examples
///
/// ```
/// use size_analyzer::snapshot::CsvTable;
///
/// let table = CsvTable::parse("filename,compressed\n\"a,b.txt\", 10\nbroken\n");
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.identity_column(), Some("filename"));
///
/// let record = table.records().next().unwrap();
/// assert_eq!(record.get("filename"), Some("a,b.txt"));
/// assert_eq!(record.get("compressed"), Some("10"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse raw CSV text
    ///
    /// Fields are trimmed; double-quoted fields may contain commas. Rows whose
    /// field count differs from the header are dropped. Empty input yields an
    /// empty table.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = match reader.headers() {
            Ok(record) => record.iter().map(str::to_string).collect(),
            Err(e) => {
                warn!("Unreadable CSV header, treating snapshot as empty: {}", e);
                return Self::default();
            }
        };

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for result in reader.records() {
            match result {
                Ok(record) if record.len() == headers.len() => {
                    rows.push(record.iter().map(str::to_string).collect());
                }
                Ok(_) => dropped += 1,
                Err(e) => {
                    debug!("Skipping unreadable CSV row: {}", e);
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            debug!(
                "Dropped {} malformed row(s) (expected {} fields)",
                dropped,
                headers.len()
            );
        }

        Self { headers, rows }
    }

    /// Header names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Iterate rows as header-keyed records
    pub fn records(&self) -> impl Iterator<Item = CsvRecord<'_>> {
        self.rows.iter().map(move |values| CsvRecord {
            headers: &self.headers,
            values,
        })
    }

    /// The column holding file identity, see [`identify_filename_column`]
    pub fn identity_column(&self) -> Option<&str> {
        identify_filename_column(&self.headers)
    }

    /// The numeric metric columns, see [`metric_columns`]
    pub fn metric_columns(&self) -> Vec<String> {
        match self.identity_column() {
            Some(identity) => metric_columns(&self.headers, identity),
            None => Vec::new(),
        }
    }
}

/// A single row viewed as an ordered header → value mapping
#[derive(Debug, Clone, Copy)]
pub struct CsvRecord<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> CsvRecord<'a> {
    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// (header, value) pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// Pick the file identity column from a header row
///
/// The first header equal (case-insensitively) to one of
/// [`IDENTITY_COLUMN_TOKENS`] wins; otherwise the first header is used.
/// Returns `None` only for an empty header row.
pub fn identify_filename_column(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .find(|h| {
            IDENTITY_COLUMN_TOKENS
                .iter()
                .any(|token| h.eq_ignore_ascii_case(token))
        })
        .or_else(|| headers.first())
        .map(String::as_str)
}

/// All headers except the identity column, in header order
pub fn metric_columns(headers: &[String], identity: &str) -> Vec<String> {
    headers
        .iter()
        .filter(|h| h.as_str() != identity)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_trims_fields_and_keeps_header_order() {
        let table = CsvTable::parse("compileunits, vmsize ,filesize\n src/a.cpp , 10, 20\n");

        assert_eq!(table.headers(), &["compileunits", "vmsize", "filesize"]);
        let record = table.records().next().expect("one row");
        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("compileunits", "src/a.cpp"),
                ("vmsize", "10"),
                ("filesize", "20")
            ]
        );
    }

    #[test]
    fn test_parse_quoted_field_keeps_embedded_comma() {
        let table = CsvTable::parse("filename,compressed\n\"dir/a,b.txt\",42\n");

        assert_eq!(table.len(), 1);
        let record = table.records().next().unwrap();
        assert_eq!(record.get("filename"), Some("dir/a,b.txt"));
        assert_eq!(record.get("compressed"), Some("42"));
    }

    #[test]
    fn test_parse_drops_rows_with_wrong_field_count() {
        let text = "filename,compressed,uncompressed\n\
                    a.txt,1,2\n\
                    b.txt,3\n\
                    c.txt,4,5,6\n\
                    d.txt,7,8\n";
        let table = CsvTable::parse(text);

        let names: Vec<_> = table
            .records()
            .map(|r| r.get("filename").unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "d.txt"]);
    }

    #[test]
    fn test_parse_empty_input_yields_empty_table() {
        for input in ["", "   ", "\n\n"] {
            let table = CsvTable::parse(input);
            assert!(table.headers().is_empty());
            assert!(table.is_empty());
            assert_eq!(table.identity_column(), None);
            assert!(table.metric_columns().is_empty());
        }
    }

    #[test]
    fn test_parse_header_only_has_no_rows() {
        let table = CsvTable::parse("filename,compressed\n");
        assert_eq!(table.headers().len(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_identify_filename_column_prefers_known_tokens() {
        let h = headers(&["compileunits", "vmsize", "filesize"]);
        assert_eq!(identify_filename_column(&h), Some("compileunits"));
        assert_eq!(metric_columns(&h, "compileunits"), vec!["vmsize", "filesize"]);
    }

    #[test]
    fn test_identify_filename_column_is_case_insensitive_and_first_match_wins() {
        let h = headers(&["size", "FileName", "compileunits"]);
        assert_eq!(identify_filename_column(&h), Some("FileName"));
    }

    #[test]
    fn test_identify_filename_column_falls_back_to_first_header() {
        let h = headers(&["symbol_group_name", "vmsize", "filesize"]);
        assert_eq!(identify_filename_column(&h), Some("symbol_group_name"));
        assert_eq!(
            metric_columns(&h, "symbol_group_name"),
            vec!["vmsize", "filesize"]
        );
    }

    #[test]
    fn test_record_get_unknown_column_returns_none() {
        let table = CsvTable::parse("filename,compressed\na,1\n");
        let record = table.records().next().unwrap();
        assert_eq!(record.get("uncompressed"), None);
        assert!(table.has_column("compressed"));
        assert!(!table.has_column("uncompressed"));
    }
}
