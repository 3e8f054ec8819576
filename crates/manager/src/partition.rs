// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input partitioning for the map and reduce stages.

use std::io;
use std::path::{Path, PathBuf};

/// Lists `input_dir`, sorts file names lexicographically, and assigns
/// file `i` to map task `i mod num_mappers`. Returns `num_mappers` groups
/// in task-id order; a group may be empty, and empty tasks are still
/// issued.
pub fn partition_for_map(input_dir: &Path, num_mappers: u32) -> io::Result<Vec<Vec<PathBuf>>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.path())
        .collect();
    files.sort();

    let mut groups = vec![Vec::new(); num_mappers as usize];
    for (i, file) in files.into_iter().enumerate() {
        groups[i % num_mappers as usize].push(file);
    }
    Ok(groups)
}

/// Lists `job_scratch_dir`, groups files by the `-part{PART:05d}` suffix
/// in their name, and returns `num_reducers` groups in partition order.
/// Each group's files are sorted lexicographically so k-way merge input
/// order is deterministic.
pub fn partition_for_reduce(
    job_scratch_dir: &Path,
    num_reducers: u32,
) -> io::Result<Vec<Vec<PathBuf>>> {
    let mut groups = vec![Vec::new(); num_reducers as usize];
    for entry in std::fs::read_dir(job_scratch_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(partition) = partition_suffix(name) else {
            continue;
        };
        if let Some(group) = groups.get_mut(partition as usize) {
            group.push(path);
        }
    }
    for group in &mut groups {
        group.sort();
    }
    Ok(groups)
}

/// Parses the trailing `-part{PART:05d}` suffix off a `maptask*` file name.
fn partition_suffix(file_name: &str) -> Option<u32> {
    let (_, suffix) = file_name.rsplit_once("-part")?;
    suffix.parse().ok()
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
