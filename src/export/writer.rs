//! Output file helpers shared by the exporters.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::JSON_INDENT;
use crate::error_handling::ExportError;

pub(crate) fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Creates `path`, truncating an existing file.
pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path).map(BufWriter::new).map_err(io_error(path))
}

/// Writes `value` to `path` as pretty JSON with a one-space indent.
pub(crate) fn write_pretty_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), ExportError> {
    let mut writer = create_file(path)?;
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    writer.flush().map_err(io_error(path))
}
