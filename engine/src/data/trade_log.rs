// The trade log as exported from the journal spreadsheet. Columns are whatever the sheet has.
use anyhow::{anyhow, bail, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeLog {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TradeLog {
    pub fn load_from_csv(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|e| anyhow!("Failed to open trade log '{}': {}", path.display(), e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Every row must have as many cells as the header; ragged rows are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).flexible(false).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| anyhow!("Error reading trade log record at line {}: {}", idx + 2, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        tracing::debug!(columns = headers.len(), rows = rows.len(), "Loaded trade log");
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column by header name.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let pos = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|row| row[pos].as_str()).collect())
    }
}

/// Rewrites a spreadsheet edit link (`.../edit#gid=N`) into its CSV export link.
pub fn sheet_export_url(sheet_url: &str) -> Result<String> {
    const EDIT_MARKER: &str = "/edit#gid=";
    if !sheet_url.contains(EDIT_MARKER) {
        bail!("'{}' is not a spreadsheet edit link (no '{}')", sheet_url, EDIT_MARKER);
    }
    Ok(sheet_url.replace(EDIT_MARKER, "/export?format=csv&gid="))
}
