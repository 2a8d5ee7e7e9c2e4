use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

use crate::config::{tmp_path, write_atomic};
use crate::errors::Result;
use crate::ledger::{LedgerKind, SparseRecord, SupplementRecord};

/// Conventional file for one sheet's month of sparse rows, e.g.
/// `2024-06-meal.json` or `2024-06-dairy.json`.
pub fn month_file(dir: &Path, year: i32, month: u32, kind: LedgerKind) -> PathBuf {
    dir.join(format!("{year:04}-{month:02}-{kind}.json"))
}

/// Loads a month's sparse rows; a missing file is an empty month.
pub fn load_sparse_records(path: &Path) -> Result<Vec<SparseRecord>> {
    load_array(path)
}

/// Writes sparse rows atomically by staging to a temporary file.
pub fn save_sparse_records(records: &[SparseRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "sparse records saved");
    Ok(())
}

pub fn load_supplement_records(path: &Path) -> Result<Vec<SupplementRecord>> {
    load_array(path)
}

fn load_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no file, starting empty");
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::ledger::{Category, Commodity};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn month_file_is_zero_padded_per_kind() {
        let meal = month_file(Path::new("/data"), 2024, 6, LedgerKind::Meal);
        let dairy = month_file(Path::new("/data"), 2024, 6, LedgerKind::Dairy);
        assert_eq!(meal, PathBuf::from("/data/2024-06-meal.json"));
        assert_eq!(dairy, PathBuf::from("/data/2024-06-dairy.json"));
    }

    #[test]
    fn missing_file_is_empty_month() {
        let temp = tempdir().unwrap();
        let rows = load_sparse_records(&temp.path().join("absent.json")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn saved_rows_load_back() {
        let temp = tempdir().unwrap();
        let path = month_file(temp.path(), 2024, 6, LedgerKind::Meal);
        let mut row = SparseRecord::for_date(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        row.younger_count = Some(12);
        row.category = Some(Category::RICE);
        save_sparse_records(&[row], &path).unwrap();

        let loaded = load_sparse_records(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].younger_count, Some(12));
        assert_eq!(loaded[0].category, Some(Category::RICE));
        assert!(loaded[0].resolved_added().get(Commodity::Rice) == 0.0);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn malformed_file_is_a_serde_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "[{").unwrap();
        assert!(matches!(load_sparse_records(&path), Err(LedgerError::Serde(_))));
    }
}
