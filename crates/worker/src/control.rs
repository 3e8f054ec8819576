// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Control Loop: boot handshake with the Manager, then a dispatch
//! loop that runs one map or reduce task at a time.

use crate::executor::{run_map_task, run_reduce_task};
use crate::state::{WorkerContext, SERVER_ACCEPT_TIMEOUT};
use mr_core::{Stage, Task, TaskId};
use mr_wire::Message;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Sends `register` to the Manager. Returns `false` if the Manager is
/// unreachable.
pub async fn register(context: &WorkerContext) -> bool {
    let message = Message::Register {
        worker_host: context.self_addr.host.clone(),
        worker_port: context.self_addr.port,
    };
    mr_wire::connect_and_send(&context.manager_addr.socket_addr_string(), &message).await
}

/// Accepts exactly one connection on `listener` and expects it to carry a
/// `register_ack`. Any other message, or a dropped connection, is a
/// failed boot handshake.
pub async fn await_register_ack(listener: &TcpListener) -> bool {
    let Ok((mut stream, _)) = listener.accept().await else { return false };
    matches!(mr_wire::read_one_message(&mut stream).await, Some(Message::RegisterAck { .. }))
}

/// Runs the dispatch loop: accepts one connection at a time with a 1s
/// timeout, executing exactly one task before accepting the next. Exits
/// when the shutdown token fires.
pub async fn run(context: Arc<WorkerContext>, listener: TcpListener) {
    loop {
        if context.shutdown.is_cancelled() {
            return;
        }
        let accepted = tokio::time::timeout(SERVER_ACCEPT_TIMEOUT, listener.accept()).await;
        let Ok(accepted) = accepted else { continue };
        match accepted {
            Ok((mut stream, _)) => {
                if let Some(message) = mr_wire::read_one_message(&mut stream).await {
                    dispatch(&context, message).await;
                }
            }
            Err(err) => tracing::warn!(error = %err, "tcp accept error"),
        }
    }
}

async fn dispatch(context: &WorkerContext, message: Message) {
    match message {
        Message::NewMapTask {
            task_id,
            input_paths,
            executable,
            output_directory,
            num_partitions,
            ..
        } => {
            let task = Task {
                id: task_id,
                stage: Stage::Map,
                input_paths,
                executable,
                output_directory,
                num_partitions: Some(num_partitions),
            };
            run_task(context, task).await;
        }
        Message::NewReduceTask { task_id, executable, input_paths, output_directory, .. } => {
            let task = Task {
                id: task_id,
                stage: Stage::Reduce,
                input_paths,
                executable,
                output_directory,
                num_partitions: None,
            };
            run_task(context, task).await;
        }
        Message::Shutdown => {
            context.shutdown.cancel();
        }
        other => {
            tracing::warn!(?other, "unexpected message on worker control channel");
        }
    }
}

/// Runs one task to completion. A non-zero sub-program exit goes silent —
/// no message is sent, and the whole Worker shuts down, mirroring the
/// "rely on the Manager's heartbeat timeout" failure policy.
async fn run_task(context: &WorkerContext, task: Task) {
    let task_id = task.id;
    let result = match task.stage {
        Stage::Map => run_map_task(&task).await,
        Stage::Reduce => run_reduce_task(&task).await,
    };
    match result {
        Ok(()) => report_finished(context, task_id).await,
        Err(err) => {
            tracing::error!(task_id = task_id.0, error = %err, "task failed, shutting down silently");
            context.shutdown.cancel();
        }
    }
}

async fn report_finished(context: &WorkerContext, task_id: TaskId) {
    let message = Message::Finished {
        task_id,
        worker_host: context.self_addr.host.clone(),
        worker_port: context.self_addr.port,
    };
    mr_wire::connect_and_send(&context.manager_addr.socket_addr_string(), &message).await;
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
