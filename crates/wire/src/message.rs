// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Message` enum: every frame exchanged between client, Manager, and
//! Worker.

use mr_core::TaskId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum Message {
    /// Worker → Manager, on boot.
    Register { worker_host: String, worker_port: u16 },
    /// Manager → Worker, in reply to `Register`.
    RegisterAck { worker_host: String, worker_port: u16 },
    /// Worker → Manager, over UDP, every 2s.
    Heartbeat { worker_host: String, worker_port: u16 },
    /// client → Manager, one per submitted job.
    NewManagerJob {
        input_directory: PathBuf,
        output_directory: PathBuf,
        mapper_executable: PathBuf,
        reducer_executable: PathBuf,
        num_mappers: u32,
        num_reducers: u32,
    },
    /// Manager → Worker, assigning one map task.
    NewMapTask {
        task_id: TaskId,
        input_paths: Vec<PathBuf>,
        executable: PathBuf,
        output_directory: PathBuf,
        num_partitions: u32,
        worker_host: String,
        worker_port: u16,
    },
    /// Manager → Worker, assigning one reduce task.
    NewReduceTask {
        task_id: TaskId,
        executable: PathBuf,
        input_paths: Vec<PathBuf>,
        output_directory: PathBuf,
        worker_host: String,
        worker_port: u16,
    },
    /// Worker → Manager, on task completion.
    Finished { task_id: TaskId, worker_host: String, worker_port: u16 },
    /// client → Manager, or Manager → Worker.
    Shutdown,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
