//! Delimited-text ingestion into a [`RawTable`]
//!
//! Every cell is read as text; type resolution is left to the cleaner.
//! Ragged rows are accepted (short rows read as missing cells).

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use super::*;

/// Options for reading delimited text
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

/// Read a delimited file from disk
pub fn read_csv_path(path: impl AsRef<Path>, options: CsvOptions) -> Result<RawTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    log::debug!("reading {}", path.display());
    read_csv(file, options)
}

/// Read delimited text from any reader
pub fn read_csv<R: Read>(reader: R, options: CsvOptions) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = if options.has_headers {
        rdr.headers()?.iter().map(|s| s.trim().to_string()).collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(RawCell::from_text).collect::<Vec<_>>());
    }

    log::debug!("read {} columns, {} rows", headers.len(), rows.len());
    Ok(RawTable::new(headers, rows))
}
