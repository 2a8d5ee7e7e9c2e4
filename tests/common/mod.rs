#![allow(dead_code)]

use std::{fs, path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use commodity_ledger::ledger::{Category, SparseRecord};
use once_cell::sync::Lazy;
use serde_json::Value;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const EPS: f64 = 1e-9;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// Creates an isolated application directory for one test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn sparse_day(on: NaiveDate, younger: u32, older: u32, category: Category) -> SparseRecord {
    SparseRecord {
        younger_count: Some(younger),
        older_count: Some(older),
        category: Some(category),
        ..SparseRecord::for_date(on)
    }
}

/// Writes a raw JSON fixture and returns its path.
pub fn write_json(dir: &PathBuf, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(dir).expect("create fixture dir");
    fs::write(&path, serde_json::to_string_pretty(value).expect("encode fixture"))
        .expect("write fixture");
    path
}
