// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manager Control Loop: the TCP server (registration, job submission,
//! completion reports, shutdown) and the UDP server (heartbeats).

use crate::state::{ManagerState, SERVER_ACCEPT_TIMEOUT};
use crate::ManagerError;
use mr_core::{JobSpec, WorkerAddr};
use mr_wire::Message;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};

/// Accepts one connection at a time with a 1s timeout, dispatching each
/// message by type. Runs until the shutdown token fires.
pub async fn run_tcp_server(state: Arc<ManagerState>, listener: TcpListener) {
    loop {
        if state.shutdown.is_cancelled() {
            return;
        }
        let accepted = tokio::time::timeout(SERVER_ACCEPT_TIMEOUT, listener.accept()).await;
        let Ok(accepted) = accepted else { continue };
        match accepted {
            Ok((mut stream, _)) => {
                if let Some(message) = mr_wire::read_one_message(&mut stream).await {
                    dispatch_tcp(&state, message).await;
                }
            }
            Err(err) => tracing::warn!(error = %err, "tcp accept error"),
        }
    }
}

async fn dispatch_tcp(state: &ManagerState, message: Message) {
    match message {
        Message::Register { worker_host, worker_port } => {
            let addr = WorkerAddr::new(worker_host, worker_port);
            let orphaned = state.registry.lock().register(addr.clone());
            if let Some(task_id) = orphaned {
                state.replay.lock().push_back(task_id);
            }
            let ack = Message::RegisterAck {
                worker_host: addr.host.clone(),
                worker_port: addr.port,
            };
            if !mr_wire::connect_and_send(&addr.socket_addr_string(), &ack).await {
                state.registry.lock().mark_dead(&addr);
            }
        }
        Message::NewManagerJob {
            input_directory,
            output_directory,
            mapper_executable,
            reducer_executable,
            num_mappers,
            num_reducers,
        } => {
            let job = JobSpec {
                id: state.job_id_gen.next_id(),
                input_directory,
                output_directory,
                mapper_executable,
                reducer_executable,
                num_mappers,
                num_reducers,
            };
            tracing::info!(job_id = %job.id, "enqueuing job");
            state.job_queue.lock().push_back(job);
        }
        Message::Finished { task_id, worker_host, worker_port } => {
            state.dispatch_finished(task_id, WorkerAddr::new(worker_host, worker_port));
        }
        Message::Shutdown => {
            broadcast_shutdown(state).await;
            state.shutdown.cancel();
        }
        other => {
            tracing::warn!(?other, "unexpected message on manager control channel");
        }
    }
}

async fn broadcast_shutdown(state: &ManagerState) {
    let targets = state.registry.lock().all_non_dead();
    let sends = targets
        .into_iter()
        .map(|addr| async move { mr_wire::connect_and_send(&addr.socket_addr_string(), &Message::Shutdown).await });
    futures::future::join_all(sends).await;
}

/// Binds the UDP heartbeat server: every well-formed `heartbeat` from a
/// known, non-Dead address resets its missed-heartbeat counter.
pub async fn run_udp_server(state: Arc<ManagerState>, socket: UdpSocket) {
    loop {
        if state.shutdown.is_cancelled() {
            return;
        }
        let received = tokio::time::timeout(SERVER_ACCEPT_TIMEOUT, mr_wire::recv_udp(&socket)).await;
        let Ok(Some(message)) = received else { continue };
        if let Message::Heartbeat { worker_host, worker_port } = message {
            state.registry.lock().record_heartbeat(&WorkerAddr::new(worker_host, worker_port));
        }
    }
}

pub async fn bind(host: &str, port: u16) -> Result<(TcpListener, UdpSocket), ManagerError> {
    let addr = format!("{host}:{port}");
    let tcp = TcpListener::bind(&addr)
        .await
        .map_err(|source| ManagerError::Bind { addr: addr.clone(), source })?;
    let udp = UdpSocket::bind(&addr).await.map_err(|source| ManagerError::Bind { addr, source })?;
    Ok((tcp, udp))
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
