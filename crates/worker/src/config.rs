// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface and logging bootstrap for `mr-workerd`.

use crate::WorkerError;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
pub struct WorkerConfig {
    #[arg(long, default_value = "localhost")]
    pub host: String,
    #[arg(long)]
    pub port: u16,
    #[arg(long)]
    pub manager_host: String,
    #[arg(long)]
    pub manager_port: u16,
    #[arg(long)]
    pub logfile: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    pub loglevel: String,
}

/// Sets up `tracing` per `--logfile`/`--loglevel`, identically to the
/// Manager's own bootstrap.
pub fn setup_logging(
    config: &WorkerConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, WorkerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.loglevel.clone()));

    let (writer, guard) = match &config.logfile {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("mr-workerd.log"));
            let appender = tracing_appender::rolling::never(dir, file_name);
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}
