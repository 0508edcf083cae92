//! Batch normalization: required-field filtering and first-wins dedup.
//!
//! The source's cleaning rules, expressed over typed records: a record with
//! a missing required field is dropped, and among the survivors only the
//! first occurrence per identity key is kept, preserving input order. Which
//! fields are "required" and what the identity key is are projections passed
//! by the caller, so the same pass serves every dimension. No value
//! imputation happens here or anywhere else.

use std::collections::HashSet;
use std::hash::Hash;

/// Drop records whose required fields are missing. Pure; order-preserving.
pub fn retain_complete<T>(batch: Vec<T>, required: impl Fn(&T) -> bool) -> Vec<T> {
    batch.into_iter().filter(|r| required(r)).collect()
}

/// Drop incomplete records, then keep the first record per identity key.
///
/// An empty result is valid. The output is a subsequence of the input.
pub fn normalize<T, K>(
    batch: Vec<T>,
    required: impl Fn(&T) -> bool,
    identity: impl Fn(&T) -> K,
) -> Vec<T>
where
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    batch
        .into_iter()
        .filter(|r| required(r))
        .filter(|r| seen.insert(identity(r)))
        .collect()
}
