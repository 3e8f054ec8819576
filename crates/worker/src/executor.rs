// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Task Executor: runs a single map or reduce task inline, one at a
//! time. Both stages spawn the task's opaque executable, stream data
//! through it, and atomically promote the result into place.

use crate::WorkerError;
use mr_core::scratch::{map_partition_filename, reduce_output_filename};
use mr_core::{ScratchDir, Task};
use std::collections::{BinaryHeap, VecDeque};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

fn missing_pipe(which: &str) -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, format!("child process has no {which}"))
}

fn take_stdin(child: &mut Child) -> Result<tokio::process::ChildStdin, WorkerError> {
    child.stdin.take().ok_or_else(|| missing_pipe("stdin").into())
}

fn take_stdout(child: &mut Child) -> Result<tokio::process::ChildStdout, WorkerError> {
    child.stdout.take().ok_or_else(|| missing_pipe("stdout").into())
}

/// `int(md5(key).hexdigest(), 16) mod num_partitions`, computed byte by
/// byte so the 128-bit digest never needs a bignum type.
pub fn partition_for_key(key: &[u8], num_partitions: u32) -> u32 {
    let digest = md5::compute(key);
    let mut acc: u64 = 0;
    for byte in digest.0 {
        acc = (acc * 256 + u64::from(byte)) % u64::from(num_partitions);
    }
    acc as u32
}

fn map_key(line: &str) -> &str {
    line.split('\t').next().unwrap_or(line)
}

/// Runs one map task: streams each input file through the mapper, routes
/// each output line to `md5(key) mod P`, sorts each partition file, and
/// renames all of them into `task.output_directory`.
pub async fn run_map_task(task: &Task) -> Result<(), WorkerError> {
    let num_partitions = task.num_partitions.unwrap_or(1);
    let scratch = ScratchDir::for_task(None, task.id)?;

    let partition_paths: Vec<PathBuf> = (0..num_partitions)
        .map(|p| scratch.path().join(map_partition_filename(task.id, p)))
        .collect();
    let mut partition_files: Vec<std::fs::File> = partition_paths
        .iter()
        .map(|path| OpenOptions::new().create(true).append(true).open(path))
        .collect::<io::Result<_>>()?;

    for input_path in &task.input_paths {
        let mut child =
            Command::new(&task.executable).stdin(Stdio::piped()).stdout(Stdio::piped()).spawn()?;
        let mut stdin = take_stdin(&mut child)?;
        let stdout = take_stdout(&mut child)?;

        let input_path = input_path.clone();
        let writer = tokio::spawn(async move {
            let bytes = tokio::fs::read(&input_path).await?;
            stdin.write_all(&bytes).await?;
            drop(stdin);
            Ok::<(), io::Error>(())
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            let partition = partition_for_key(map_key(&line).as_bytes(), num_partitions) as usize;
            partition_files[partition].write_all(line.as_bytes())?;
            partition_files[partition].write_all(b"\n")?;
        }

        writer.await.map_err(|_| missing_pipe("writer task join"))??;
        let status = child.wait().await?;
        if !status.success() {
            return Err(WorkerError::TaskFailed { task_id: task.id.0 });
        }
    }
    drop(partition_files);

    for (p, scratch_path) in partition_paths.into_iter().enumerate() {
        let contents = std::fs::read_to_string(&scratch_path)?;
        let mut lines: Vec<&str> = contents.lines().collect();
        lines.sort_unstable();
        let sorted = if lines.is_empty() { String::new() } else { lines.join("\n") + "\n" };
        std::fs::write(&scratch_path, sorted)?;

        let dest = task.output_directory.join(map_partition_filename(task.id, p as u32));
        std::fs::rename(&scratch_path, dest)?;
    }

    Ok(())
}

/// Runs one reduce task: k-way merges the (already-sorted) input
/// partitions, pipes the merge into the reducer, and renames its output
/// into `task.output_directory`.
pub async fn run_reduce_task(task: &Task) -> Result<(), WorkerError> {
    let scratch = ScratchDir::for_task(None, task.id)?;
    let merged = k_way_merge(&task.input_paths)?;

    let mut child =
        Command::new(&task.executable).stdin(Stdio::piped()).stdout(Stdio::piped()).spawn()?;
    let mut stdin = take_stdin(&mut child)?;
    let mut stdout = take_stdout(&mut child)?;

    let writer = tokio::spawn(async move {
        stdin.write_all(merged.as_bytes()).await?;
        drop(stdin);
        Ok::<(), io::Error>(())
    });

    let output_path = scratch.path().join(reduce_output_filename(task.id));
    let mut output_file = tokio::fs::File::create(&output_path).await?;
    tokio::io::copy(&mut stdout, &mut output_file).await?;

    writer.await.map_err(|_| missing_pipe("writer task join"))??;
    let status = child.wait().await?;
    if !status.success() {
        return Err(WorkerError::TaskFailed { task_id: task.id.0 });
    }

    let dest = task.output_directory.join(reduce_output_filename(task.id));
    std::fs::rename(&output_path, dest)?;
    Ok(())
}

/// External k-way merge of already line-sorted files, by a `BinaryHeap` of
/// per-file line cursors.
fn k_way_merge(paths: &[PathBuf]) -> io::Result<String> {
    let mut queues: Vec<VecDeque<String>> = paths
        .iter()
        .map(|path| Ok(std::fs::read_to_string(path)?.lines().map(String::from).collect()))
        .collect::<io::Result<_>>()?;

    let mut heap: BinaryHeap<std::cmp::Reverse<(String, usize)>> = BinaryHeap::new();
    for (index, queue) in queues.iter_mut().enumerate() {
        if let Some(line) = queue.pop_front() {
            heap.push(std::cmp::Reverse((line, index)));
        }
    }

    let mut merged = String::new();
    while let Some(std::cmp::Reverse((line, index))) = heap.pop() {
        merged.push_str(&line);
        merged.push('\n');
        if let Some(next) = queues[index].pop_front() {
            heap.push(std::cmp::Reverse((next, index)));
        }
    }
    Ok(merged)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
