// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use mr_core::WorkerAddr;
use mr_manager::config::{setup_logging, ManagerConfig};
use mr_manager::{control, heartbeat_monitor, scheduler, ManagerState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = ManagerConfig::parse();
    let _log_guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to set up logging: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    tracing::info!(host = %config.host, port = config.port, "starting manager");

    let (tcp_listener, udp_socket) = match control::bind(&config.host, config.port).await {
        Ok(bound) => bound,
        Err(err) => {
            tracing::error!(error = %err, "failed to bind");
            return std::process::ExitCode::FAILURE;
        }
    };

    let manager_addr = WorkerAddr::new(config.host.clone(), config.port);
    let state = Arc::new(ManagerState::new(manager_addr, config.shared_dir.clone()));

    let heartbeat_task = tokio::spawn(heartbeat_monitor::run(Arc::clone(&state)));
    let scheduler_task = tokio::spawn(scheduler::run(Arc::clone(&state)));
    let udp_task = tokio::spawn(control::run_udp_server(Arc::clone(&state), udp_socket));

    control::run_tcp_server(Arc::clone(&state), tcp_listener).await;

    let _ = tokio::join!(heartbeat_task, scheduler_task, udp_task);
    tracing::info!("manager shut down cleanly");
    std::process::ExitCode::SUCCESS
}
