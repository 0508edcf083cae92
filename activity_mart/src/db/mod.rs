//! Database utilities for connections and schema migrations.
//!
//! - [`connection::connect_sqlite`] opens a tuned SQLite connection (WAL,
//!   foreign_keys=ON, 5000ms busy_timeout).
//! - [`migrate::run_sqlite`] applies the embedded diesel migrations.
//!
//! Example:
//! ```no_run
//! use activity_mart::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("activity_mart_example.db");
//! migrate::run_sqlite(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
