//! Reading and writing stage artifacts.
//!
//! Every write goes to a temporary file next to the destination and is renamed into place
//! once complete, so a failed or aborted stage never leaves a partial artifact behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use util::paths::ensure_parent_dir;

use crate::error::ServiceError;

/// `true` when `path` already exists and recomputation was not forced.
pub fn should_skip(path: &Path, force: bool) -> bool {
    path.exists() && !force
}

/// Fails with [`ServiceError::MissingArtifact`] unless `path` exists.
pub fn require(stage: &'static str, path: &Path) -> Result<(), ServiceError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ServiceError::MissingArtifact {
            stage,
            path: path.to_path_buf(),
        })
    }
}

fn write_atomic<F>(path: &Path, write: F) -> Result<(), ServiceError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), ServiceError>,
{
    ensure_parent_dir(path).map_err(|e| ServiceError::io(path, e))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ServiceError::io(dir, e))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| ServiceError::io(path, e))?;
    }

    tmp.persist(path).map_err(|e| ServiceError::io(path, e.error))?;
    debug!(path = %path.display(), "artifact written");
    Ok(())
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ServiceError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ServiceError::csv(path, e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ServiceError::csv(path, e))
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ServiceError> {
    write_atomic(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        for row in rows {
            writer.serialize(row).map_err(|e| ServiceError::csv(path, e))?;
        }
        writer.flush().map_err(|e| ServiceError::io(path, e))
    })
}

/// Header row plus untyped records, for tables whose columns are passed through as-is.
pub fn read_records(path: &Path) -> Result<(csv::StringRecord, Vec<csv::StringRecord>), ServiceError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ServiceError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| ServiceError::csv(path, e))?.clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServiceError::csv(path, e))?;
    Ok((headers, records))
}

pub fn write_records(
    path: &Path,
    headers: &csv::StringRecord,
    records: &[csv::StringRecord],
) -> Result<(), ServiceError> {
    write_atomic(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(headers).map_err(|e| ServiceError::csv(path, e))?;
        for record in records {
            writer.write_record(record).map_err(|e| ServiceError::csv(path, e))?;
        }
        writer.flush().map_err(|e| ServiceError::io(path, e))
    })
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ServiceError> {
    let file = File::open(path).map_err(|e| ServiceError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ServiceError::json(path, e))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ServiceError> {
    write_atomic(path, |out| serde_json::to_writer(out, value).map_err(|e| ServiceError::json(path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        value: i32,
    }

    #[test]
    fn skip_only_when_present_and_not_forced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.csv");
        assert!(!should_skip(&path, false));
        std::fs::write(&path, "x").unwrap();
        assert!(should_skip(&path, false));
        assert!(!should_skip(&path, true));
    }

    #[test]
    fn require_reports_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let err = require("labels", &path).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn csv_writes_create_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rows.csv");
        let rows = vec![
            Row { id: "a".into(), value: 1 },
            Row { id: "b, c".into(), value: -2 },
        ];
        write_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,value\n"));
        assert_eq!(read_csv::<Row>(&path).unwrap(), rows);
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let result = write_atomic(&path, |_| Err(ServiceError::InvalidRecord("boom".into())));
        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn records_pass_unknown_columns_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "id,name,time_limit\np1,Foo,1000\n").unwrap();
        let (headers, records) = read_records(&path).unwrap();
        let out = dir.path().join("u.csv");
        write_records(&out, &headers, &records).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "id,name,time_limit\np1,Foo,1000\n");
    }
}
