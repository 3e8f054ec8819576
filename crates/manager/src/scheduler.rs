// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Scheduler: dequeues jobs FIFO, runs the map stage then the reduce
//! stage, and cleans up per-job scratch state.

use crate::partition::{partition_for_map, partition_for_reduce};
use crate::state::{ManagerState, SCHEDULER_IDLE_BACKOFF};
use crate::ManagerError;
use mr_core::{JobSpec, ScratchDir, Stage, Task, TaskId, WorkerAddr};
use mr_wire::Message;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs forever: pulls one job at a time off the FIFO queue and drives it
/// through the map then reduce stage. Jobs are strictly serialized — the
/// next job does not start until the previous one's output is written.
pub async fn run(state: Arc<ManagerState>) {
    loop {
        if state.shutdown.is_cancelled() {
            return;
        }
        let job = state.job_queue.lock().pop_front();
        let Some(job) = job else {
            tokio::select! {
                _ = tokio::time::sleep(SCHEDULER_IDLE_BACKOFF) => {}
                _ = state.shutdown.cancelled() => return,
            }
            continue;
        };
        if let Err(err) = run_job(&state, &job).await {
            tracing::error!(job_id = %job.id, error = %err, "job failed");
        }
    }
}

async fn run_job(state: &ManagerState, job: &JobSpec) -> Result<(), ManagerError> {
    tracing::info!(job_id = %job.id, "starting job");

    std::fs::remove_dir_all(&job.output_directory).ok();
    std::fs::create_dir_all(&job.output_directory)
        .map_err(|source| ManagerError::JobIo { job_id: job.id.0, source })?;

    let shared_base = state.shared_dir.as_deref();
    let scratch = ScratchDir::for_job(shared_base, job.id)
        .map_err(|source| ManagerError::JobIo { job_id: job.id.0, source })?;

    let map_groups = partition_for_map(&job.input_directory, job.num_mappers)
        .map_err(|source| ManagerError::JobIo { job_id: job.id.0, source })?;
    let map_tasks = build_tasks(
        Stage::Map,
        map_groups,
        &job.mapper_executable,
        scratch.path(),
        Some(job.num_reducers),
    );
    run_stage(state, Stage::Map, map_tasks).await;
    tracing::info!(job_id = %job.id, "map stage complete");

    let reduce_groups = partition_for_reduce(scratch.path(), job.num_reducers)
        .map_err(|source| ManagerError::JobIo { job_id: job.id.0, source })?;
    let reduce_tasks = build_tasks(
        Stage::Reduce,
        reduce_groups,
        &job.reducer_executable,
        &job.output_directory,
        None,
    );
    run_stage(state, Stage::Reduce, reduce_tasks).await;
    tracing::info!(job_id = %job.id, "reduce stage complete");

    // `scratch` drops here, removing the job's shared scratch directory.
    Ok(())
}

fn build_tasks(
    stage: Stage,
    groups: Vec<Vec<PathBuf>>,
    executable: &Path,
    output_directory: &Path,
    num_partitions: Option<u32>,
) -> Vec<Task> {
    groups
        .into_iter()
        .enumerate()
        .map(|(i, input_paths)| Task {
            id: TaskId(i as u32),
            stage,
            input_paths,
            executable: executable.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            num_partitions,
        })
        .collect()
}

/// Drives one stage (map or reduce) to completion: assigns every task to a
/// Ready worker, reassigning on send failure or Worker death, reconciling
/// `finished` reports against in-flight assignments.
async fn run_stage(state: &ManagerState, stage: Stage, tasks: Vec<Task>) {
    let total = tasks.len() as u32;
    state.replay.lock().clear();

    let mut pending: VecDeque<TaskId> = (0..total).map(TaskId).collect();
    let mut outstanding: HashMap<TaskId, WorkerAddr> = HashMap::new();
    let mut done: HashSet<TaskId> = HashSet::new();

    let mut completions = state.open_completion_channel();

    while (done.len() as u32) < total {
        if state.shutdown.is_cancelled() {
            break;
        }

        while let Ok((task_id, worker_addr)) = completions.try_recv() {
            reconcile_finished(state, &mut outstanding, &mut done, task_id, worker_addr);
        }
        if (done.len() as u32) >= total {
            break;
        }

        let Some(worker_addr) = state.registry.lock().pop_ready() else {
            tokio::select! {
                _ = tokio::time::sleep(SCHEDULER_IDLE_BACKOFF) => {}
                _ = state.shutdown.cancelled() => break,
            }
            continue;
        };

        let task_id = {
            let mut replay = state.replay.lock();
            replay.pop_front().or_else(|| pending.pop_front())
        };
        let Some(task_id) = task_id else {
            state.registry.lock().requeue_ready(&worker_addr);
            tokio::select! {
                _ = tokio::time::sleep(SCHEDULER_IDLE_BACKOFF) => {}
                _ = state.shutdown.cancelled() => break,
            }
            continue;
        };

        let task = &tasks[task_id.0 as usize];
        let message = stage_message(task, &worker_addr);
        let sent = mr_wire::connect_and_send(&worker_addr.socket_addr_string(), &message).await;
        if !sent {
            state.registry.lock().mark_dead(&worker_addr);
            state.replay.lock().push_back(task_id);
            continue;
        }

        state.registry.lock().mark_busy(&worker_addr, task_id);
        outstanding.insert(task_id, worker_addr);
    }

    state.close_completion_channel();
}

fn reconcile_finished(
    state: &ManagerState,
    outstanding: &mut HashMap<TaskId, WorkerAddr>,
    done: &mut HashSet<TaskId>,
    task_id: TaskId,
    worker_addr: WorkerAddr,
) {
    let mut registry = state.registry.lock();
    if outstanding.get(&task_id) == Some(&worker_addr) {
        outstanding.remove(&task_id);
        done.insert(task_id);
    }
    if registry.state_of(&worker_addr) != Some(mr_core::WorkerState::Dead) {
        registry.mark_ready(&worker_addr);
    }
}

fn stage_message(task: &Task, worker_addr: &WorkerAddr) -> Message {
    match task.stage {
        Stage::Map => Message::NewMapTask {
            task_id: task.id,
            input_paths: task.input_paths.clone(),
            executable: task.executable.clone(),
            output_directory: task.output_directory.clone(),
            num_partitions: task.num_partitions.unwrap_or(1),
            worker_host: worker_addr.host.clone(),
            worker_port: worker_addr.port,
        },
        Stage::Reduce => Message::NewReduceTask {
            task_id: task.id,
            executable: task.executable.clone(),
            input_paths: task.input_paths.clone(),
            output_directory: task.output_directory.clone(),
            worker_host: worker_addr.host.clone(),
            worker_port: worker_addr.port,
        },
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
