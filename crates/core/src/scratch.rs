// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scratch-directory naming and RAII cleanup.
//!
//! Job- and task-scoped scratch directories follow a fixed naming scheme so
//! operators can recognize them on disk; the directories themselves are
//! always `tempfile`-backed and released by `Drop`, on every exit path
//! including executable failure.

use crate::ids::{JobId, TaskId};
use std::io;
use std::path::Path;

/// `tempfile` prefix for a job's shared scratch directory.
pub fn job_scratch_prefix(job_id: JobId) -> String {
    format!("mapreduce-shared-job{}-", job_id.formatted())
}

/// `tempfile` prefix for a task's local scratch directory.
pub fn task_scratch_prefix(task_id: TaskId) -> String {
    format!("mapreduce-local-task{}-", task_id.formatted())
}

/// File name for one map task's output partition, before it is renamed into
/// the job's shared scratch directory.
pub fn map_partition_filename(task_id: TaskId, partition: u32) -> String {
    format!("maptask{}-part{:05}", task_id.formatted(), partition)
}

/// File name for one reduce task's output, before it is renamed into the
/// job's output directory.
pub fn reduce_output_filename(task_id: TaskId) -> String {
    format!("part-{}", task_id.formatted())
}

/// A scratch directory that removes itself on drop. Thin wrapper over
/// `tempfile::TempDir` so callers get a named constructor per scratch kind
/// and a log line on teardown, instead of bare `tempdir_in` calls scattered
/// through the scheduler and executor.
#[derive(Debug)]
pub struct ScratchDir {
    inner: tempfile::TempDir,
}

impl ScratchDir {
    /// Creates a job-scoped scratch directory under `base` (or the system
    /// temp directory when `base` is `None` — the `--shared-dir` override
    /// point).
    pub fn for_job(base: Option<&Path>, job_id: JobId) -> io::Result<Self> {
        Self::build(base, &job_scratch_prefix(job_id))
    }

    /// Creates a task-scoped scratch directory under `base`.
    pub fn for_task(base: Option<&Path>, task_id: TaskId) -> io::Result<Self> {
        Self::build(base, &task_scratch_prefix(task_id))
    }

    fn build(base: Option<&Path>, prefix: &str) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let inner = match base {
            Some(dir) => builder.tempdir_in(dir)?,
            None => builder.tempdir()?,
        };
        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        tracing::debug!(path = %self.inner.path().display(), "removing scratch directory");
    }
}

#[cfg(test)]
#[path = "scratch_tests.rs"]
mod tests;
