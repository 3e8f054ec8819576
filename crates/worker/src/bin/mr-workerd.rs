// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use mr_core::WorkerAddr;
use mr_worker::config::{setup_logging, WorkerConfig};
use mr_worker::{control, heartbeat, WorkerContext};
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = WorkerConfig::parse();
    let _log_guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to set up logging: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    tracing::info!(host = %config.host, port = config.port, "starting worker");

    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %bind_addr, error = %err, "failed to bind");
            return std::process::ExitCode::FAILURE;
        }
    };
    let udp_socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => socket,
        Err(err) => {
            tracing::error!(error = %err, "failed to bind heartbeat socket");
            return std::process::ExitCode::FAILURE;
        }
    };

    let self_addr = WorkerAddr::new(config.host.clone(), config.port);
    let manager_addr = WorkerAddr::new(config.manager_host.clone(), config.manager_port);
    let context = Arc::new(WorkerContext::new(self_addr, manager_addr));

    if !control::register(&context).await {
        tracing::error!("failed to reach manager during registration");
        return std::process::ExitCode::FAILURE;
    }
    if !control::await_register_ack(&listener).await {
        tracing::error!("did not receive register_ack from manager");
        return std::process::ExitCode::FAILURE;
    }

    let heartbeat_task = tokio::spawn(heartbeat::run(Arc::clone(&context), udp_socket));
    control::run(Arc::clone(&context), listener).await;

    let _ = heartbeat_task.await;
    tracing::info!("worker shut down");
    std::process::ExitCode::SUCCESS
}
