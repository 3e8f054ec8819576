// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-submit: a one-shot client that sends a single `new_manager_job`
//! message to the Manager and exits.

use clap::Parser;
use mr_wire::Message;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
struct SubmitArgs {
    #[arg(long, default_value = "localhost")]
    host: String,
    #[arg(long)]
    port: u16,
    #[arg(long)]
    input_directory: PathBuf,
    #[arg(long)]
    output_directory: PathBuf,
    #[arg(long)]
    mapper_executable: PathBuf,
    #[arg(long)]
    reducer_executable: PathBuf,
    #[arg(long)]
    num_mappers: u32,
    #[arg(long)]
    num_reducers: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = SubmitArgs::parse();
    let message = Message::NewManagerJob {
        input_directory: args.input_directory,
        output_directory: args.output_directory,
        mapper_executable: args.mapper_executable,
        reducer_executable: args.reducer_executable,
        num_mappers: args.num_mappers,
        num_reducers: args.num_reducers,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let addr = format!("{}:{}", args.host, args.port);
    let sent = runtime.block_on(mr_wire::connect_and_send(&addr, &message));
    if !sent {
        tracing::error!(%addr, "failed to submit job: manager unreachable");
        return ExitCode::FAILURE;
    }

    tracing::info!(%addr, "job submitted");
    ExitCode::SUCCESS
}
