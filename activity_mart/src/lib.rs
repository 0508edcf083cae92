//! Batch ETL from semi-structured catalog and activity-log files into a
//! relational star schema.
//!
//! Source units (JSON-lines files) are discovered under two data roots and
//! loaded one at a time: catalog units into the provider/item dimensions,
//! log batches into the time/actor dimensions and the activity fact table.
//! Loads are idempotent by key; duplicates and other rejected rows are
//! narrated and appended to an audit ledger instead of aborting the batch.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod discover;
pub mod ledger;
pub mod load;
pub mod models;
pub mod normalize;
pub mod records;
pub mod repo;
pub mod runner;
pub mod schema;
pub mod timemark;
