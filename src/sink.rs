// JSON sink for aggregate records (4-space indent, overwrite-in-place)

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::AggregateRecord;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serializing {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Serialize `value` as UTF-8 JSON indented with 4 spaces.
pub(crate) fn to_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Write one record to `path`, creating or overwriting exactly one file.
/// A missing parent directory or unwritable target surfaces as `Io`; the
/// caller decides what a failed sink means for the run.
pub fn write_record(record: &AggregateRecord, path: &Path) -> Result<(), SinkError> {
    let buf = to_indented_json(record).map_err(|source| SinkError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, buf).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the noised record to the public path and the exact record to the
/// private path, each in its own failure scope so one sink failing cannot
/// suppress the other.
pub fn write_both(
    noised: &AggregateRecord,
    public_path: &Path,
    exact: &AggregateRecord,
    private_path: &Path,
) -> (Result<(), SinkError>, Result<(), SinkError>) {
    (
        write_record(noised, public_path),
        write_record(exact, private_path),
    )
}
