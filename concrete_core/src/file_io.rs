//! # File I/O Module
//!
//! JSON files consumed and produced by the engine:
//! - **Parameter bundles** ([`CalculationParameters`]) read by the CLI
//! - **Span tables** ([`SpanTable`]) supplied by joist manufacturers
//! - **Results and records**, written with atomic saves
//!
//! Saves write to a `.tmp` sibling, sync it, then rename over the target so
//! an interrupted write never leaves a truncated file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use concrete_core::calculations::{CalculationRecord, ProductType};
//! use concrete_core::file_io::{load_parameters, save_json};
//! use std::path::Path;
//!
//! let params = load_parameters(Path::new("beam.json"))?;
//! let mut record = CalculationRecord::new("B1", ProductType::Beam, "EC2", params);
//! record.run(None);
//! save_json(&record, Path::new("beam.result.json"))?;
//! # Ok::<(), concrete_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::calculations::{CalculationParameters, CalculationRecord, SpanTable};
use crate::errors::{CalcError, CalcResult};

/// Read and parse a JSON file.
fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save any serializable value as pretty JSON using an atomic write.
///
/// # Example
///
/// ```rust,no_run
/// use concrete_core::codes::registry::list_codes;
/// use concrete_core::file_io::save_json;
/// use std::path::Path;
///
/// save_json(&list_codes(), Path::new("codes.json"))?;
/// # Ok::<(), concrete_core::errors::CalcError>(())
/// ```
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::debug!("saved {}", path.display());
    Ok(())
}

/// Load a calculation parameter bundle and validate it.
pub fn load_parameters(path: &Path) -> CalcResult<CalculationParameters> {
    let params: CalculationParameters = load_json(path)?;
    params.validate()?;
    Ok(params)
}

/// Load and validate a manufacturer span table (JSON array of rows).
///
/// # Example
///
/// ```rust,no_run
/// use concrete_core::file_io::load_span_table;
/// use std::path::Path;
///
/// let table = load_span_table(Path::new("span_table.json"))?;
/// println!("{} rows, columns {:?}", table.rows.len(), table.load_columns());
/// # Ok::<(), concrete_core::errors::CalcError>(())
/// ```
pub fn load_span_table(path: &Path) -> CalcResult<SpanTable> {
    let table: SpanTable = load_json(path)?;
    table.validate()?;
    log::info!("loaded {} span table rows from {}", table.rows.len(), path.display());
    Ok(table)
}

/// Load a previously saved calculation record.
pub fn load_record(path: &Path) -> CalcResult<CalculationRecord> {
    load_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::element::Geometry;
    use crate::calculations::{CalculationStatus, ProductType};
    use crate::loads::LoadSet;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("concreteflow_test_{}.json", name))
    }

    #[test]
    fn test_record_save_and_load() {
        let path = temp_path("record");
        let params = CalculationParameters::new(Geometry::new(6.0, 0.3, 0.6), LoadSet::per_length(12.0, 8.0));
        let mut record = CalculationRecord::new("B1", ProductType::Beam, "EC2", params);
        record.run(None);
        save_json(&record, &path).unwrap();

        let loaded = load_record(&path).unwrap();
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.name, "B1");
        assert_eq!(loaded.status, CalculationStatus::Completed);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic");
        let tmp_path = path.with_extension("json.tmp");

        save_json(&vec![1, 2, 3], &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_parameters_validates() {
        let path = temp_path("bad_params");
        fs::write(
            &path,
            r#"{"geometry": {"span_m": -1.0, "width_m": 0.3, "height_m": 0.5},
                "loads": {"permanent": 5.0, "live": 2.5}}"#,
        )
        .unwrap();

        let err = load_parameters(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_span_table() {
        let path = temp_path("span_table");
        fs::write(
            &path,
            r#"[{"reference": "BP113", "block_height_cm": 16, "spacing_cm": 60,
                 "spans_m": {"450": 5.7, "550": 5.4}}]"#,
        )
        .unwrap();

        let table = load_span_table(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].reference, "BP113");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_span_table(Path::new("/nonexistent/span_table.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();

        let err = load_parameters(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert!(err.to_string().contains("concreteflow_test_invalid"));

        let _ = fs::remove_file(&path);
    }
}
