//! CSV companion output.
//!
//! The file starts with a UTF-8 byte order mark so spreadsheet tools pick the
//! right encoding. `null` cells are written as empty fields.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;
use serde_json::Value;

use super::writer::{create_file, io_error};
use crate::config::UTF8_BOM;
use crate::error_handling::ExportError;

/// Text of one CSV field.
pub(crate) fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Row-at-a-time CSV writer with a BOM and a header line.
pub(crate) struct CsvExport {
    path: PathBuf,
    writer: Writer<BufWriter<File>>,
}

impl CsvExport {
    /// Creates `path` and writes the BOM and header.
    pub(crate) fn create<I, S>(path: &Path, header: I) -> Result<Self, ExportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut file = create_file(path)?;
        file.write_all(UTF8_BOM).map_err(io_error(path))?;
        let mut writer = Writer::from_writer(file);
        writer.write_record(header)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    /// Appends one record.
    pub(crate) fn write_row(&mut self, cells: &[Value]) -> Result<(), ExportError> {
        self.writer.write_record(cells.iter().map(csv_cell))?;
        Ok(())
    }

    /// Flushes all buffered output.
    pub(crate) fn finish(mut self) -> Result<PathBuf, ExportError> {
        self.writer.flush().map_err(io_error(&self.path))?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_csv_cell() {
        assert_eq!(csv_cell(&Value::Null), "");
        assert_eq!(csv_cell(&json!("x")), "x");
        assert_eq!(csv_cell(&json!(3)), "3");
        assert_eq!(csv_cell(&json!(0.5)), "0.5");
        assert_eq!(csv_cell(&json!(true)), "true");
    }

    #[test]
    fn test_bom_header_and_quoting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut csv = CsvExport::create(&path, ["A", "B"]).unwrap();
        csv.write_row(&[json!("x,y"), Value::Null]).unwrap();
        csv.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "A,B\n\"x,y\",\n");
    }
}
