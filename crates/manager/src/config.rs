// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface and logging bootstrap for `mr-managerd`.

use crate::ManagerError;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
pub struct ManagerConfig {
    #[arg(long, default_value = "localhost")]
    pub host: String,
    #[arg(long)]
    pub port: u16,
    #[arg(long)]
    pub logfile: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    pub loglevel: String,
    /// Overrides the base directory in which job scratch directories are
    /// created (defaults to the system temp directory).
    #[arg(long)]
    pub shared_dir: Option<PathBuf>,
}

/// Sets up `tracing` per `--logfile`/`--loglevel`: a file appender when
/// `--logfile` is given, otherwise stderr. Returns the `WorkerGuard` the
/// caller must keep alive for the process lifetime (dropping it flushes
/// and joins the background writer thread).
pub fn setup_logging(
    config: &ManagerConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, ManagerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.loglevel.clone()));

    let (writer, guard) = match &config.logfile {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("mr-managerd.log"));
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
