#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use activity_mart::db::{connection, migrate};
use activity_mart::ledger::LoadLedger;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use tempfile::TempDir;

pub struct TestDb {
    pub dir: TempDir, // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { dir, path }, conn)
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    let row: CountRow = diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
        .get_result(conn)
        .expect("count");
    row.n
}

pub fn fk_check_empty(conn: &mut SqliteConnection) {
    let row: CountRow =
        diesel::sql_query("SELECT COUNT(*) AS n FROM pragma_foreign_key_check()")
            .get_result(conn)
            .expect("fk check");
    assert_eq!(row.n, 0, "foreign key violations present");
}

/// Write one JSON-lines source unit under `dir`, creating parent dirs.
pub fn write_unit(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("unit dir");
    }
    let mut f = std::fs::File::create(&path).expect("unit file");
    for line in lines {
        writeln!(f, "{line}").expect("unit line");
    }
    path
}

pub fn open_ledger(dir: &Path) -> (PathBuf, LoadLedger) {
    let path = dir.join("ledger.log");
    let ledger = LoadLedger::open(&path).expect("open ledger");
    (path, ledger)
}

pub fn ledger_lines(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(path)
        .expect("read ledger")
        .lines()
        .map(|s| s.to_string())
        .collect()
}
