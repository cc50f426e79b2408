use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, StringRecord};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Timestamp handling for downloaded intraday bars
pub mod bar_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, FixedOffset};

    // Parses "2023-11-09 09:30:00-05:00" (the usual download format) or RFC 3339.
    pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
        let s = s.trim();
        DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z")
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))
    }

    pub fn parse_price(s: &str) -> Result<f64> {
        s.trim()
            .parse::<f64>()
            .map_err(|e| anyhow!("Failed to parse price '{}': {}", s, e))
    }

}

pub struct CandleCsvParser;

impl CandleCsvParser {
    const TIMESTAMP_HEADERS: [&'static str; 3] = ["Datetime", "Date", "Timestamp"];

    // CSV Header: Datetime,Open,High,Low,Close,Adj Close,Volume
    // Example Row: 2023-11-09 09:30:00-05:00,4382.77,4386.22,4381.56,4385.09,4385.09,0
    pub fn load_candles_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<Candle>> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|e| anyhow!("Failed to open CSV file '{}': {}", path.display(), e))?;
        let candles = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), count = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }

    /// Reads bars from any comma-delimited source with a header row. Extra columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let timestamp_header = Self::TIMESTAMP_HEADERS
            .iter()
            .copied()
            .find(|name| headers.iter().any(|h| h.trim() == *name))
            .ok_or_else(|| anyhow!("Missing timestamp column (expected one of {:?})", Self::TIMESTAMP_HEADERS))?;

        let mut candles = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let timestamp_str = Self::require_field(&record, &headers, timestamp_header, line)?;
            let timestamp = bar_format::parse_timestamp(timestamp_str)
                .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", timestamp_header, line, e))?;

            let open = Self::price(&record, &headers, "Open", line)?;
            let high = Self::price(&record, &headers, "High", line)?;
            let low = Self::price(&record, &headers, "Low", line)?;
            let close = Self::price(&record, &headers, "Close", line)?;

            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
            });
        }
        Ok(candles)
    }

    fn price(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        let raw = Self::require_field(record, headers, name, line)?;
        bar_format::parse_price(raw).map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))
    }

    fn require_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Looks a field up by header name so column order in the export doesn't matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .and_then(|pos| record.get(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_candles_from_csv_valid_data() {
        let csv_content = "\
Datetime,Open,High,Low,Close,Adj Close,Volume
2023-11-09 09:30:00-05:00,4382.77,4386.22,4381.56,4385.09,4385.09,0
2023-11-09 09:35:00-05:00,4385.21,4389.60,4384.90,4388.13,4388.13,0";
        let tmp_file = create_test_csv(csv_content);
        let candles = CandleCsvParser::load_candles_from_csv(tmp_file.path()).unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(
            candles[0].timestamp,
            bar_format::parse_timestamp("2023-11-09T09:30:00-05:00").unwrap()
        );
        assert_eq!(candles[0].open, 4382.77);
        assert_eq!(candles[0].high, 4386.22);
        assert_eq!(candles[0].low, 4381.56);
        assert_eq!(candles[0].close, 4385.09);
        assert_eq!(candles[1].close, 4388.13);
    }

    #[test]
    fn test_columns_looked_up_by_name() {
        let csv_content = "\
Close,Low,High,Open,Date
10.0,8.0,11.0,9.0,2023-11-09T09:30:00-05:00";
        let candles = CandleCsvParser::from_reader(csv_content.as_bytes()).unwrap();
        assert_eq!(candles[0].open, 9.0);
        assert_eq!(candles[0].high, 11.0);
        assert_eq!(candles[0].low, 8.0);
        assert_eq!(candles[0].close, 10.0);
    }

    #[test]
    fn test_load_candles_from_csv_empty_file() {
        let tmp_file = create_test_csv("Datetime,Open,High,Low,Close");
        let candles = CandleCsvParser::load_candles_from_csv(tmp_file.path()).unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn test_missing_timestamp_column() {
        let result = CandleCsvParser::from_reader("Open,High,Low,Close\n1,2,0.5,1.5".as_bytes());
        assert!(result.unwrap_err().to_string().contains("Missing timestamp column"));
    }

    #[test]
    fn test_load_candles_from_csv_missing_field() {
        let csv_content = "\
Datetime,Open,High,Low
2023-11-09 09:30:00-05:00,4382.77,4386.22,4381.56";
        let result = CandleCsvParser::from_reader(csv_content.as_bytes());
        assert!(result.unwrap_err().to_string().contains("Missing 'Close' field"));
    }

    #[test]
    fn test_load_candles_from_csv_invalid_data_format() {
        let csv_content = "\
Datetime,Open,High,Low,Close
2023-11-09 09:30:00-05:00,invalid,4386.22,4381.56,4385.09";
        let result = CandleCsvParser::from_reader(csv_content.as_bytes());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Error parsing 'Open'"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_missing_file() {
        let result = CandleCsvParser::load_candles_from_csv("/definitely/not/here.csv");
        assert!(result.unwrap_err().to_string().contains("Failed to open CSV file"));
    }
}
