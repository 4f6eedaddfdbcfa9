//! courier CLI: one upload attempt, outcome printed as JSON on stdout.
//!
//! Logging: set `RUST_LOG=courier_core=debug` to see task lifecycle logs on stderr.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use courier_core::impls::{DeadlineExtension, HttpTransport};
use courier_core::{Operation, TaskRunner, UploadRequest, UploadTaskBuilder, UploaderConfig, classify};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("courier_core=info,courier=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &cli.config {
        Some(path) => UploaderConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => UploaderConfig::default(),
    };

    match cli.command {
        Command::Upload {
            url,
            method,
            file,
            headers,
            cancel_after_ms,
        } => {
            let payload = match file {
                Some(path) => Some(
                    std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?,
                ),
                None => None,
            };
            let mut request = UploadRequest::post(url);
            request.method = method;
            request.headers = headers;
            run_upload(&config, request, payload, cancel_after_ms.map(Duration::from_millis)).await
        }
        Command::Classify { status } => {
            let outcome = classify(status, None);
            println!(
                "{}",
                serde_json::json!({
                    "status": status,
                    "success": outcome.success,
                    "result": outcome.result,
                })
            );
            Ok(())
        }
    }
}

async fn run_upload(
    config: &UploaderConfig,
    request: UploadRequest,
    payload: Option<Vec<u8>>,
    cancel_after: Option<Duration>,
) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::from_config(config)?);
    let extension = Arc::new(DeadlineExtension::new(config.extension_grace()));
    let (tx, mut rx) = oneshot::channel();

    let mut builder = UploadTaskBuilder::new(request)
        .transport(transport)
        .extension(extension)
        .on_complete(move |success, error| {
            let _ = tx.send((success, error));
        });
    if let Some(payload) = payload {
        builder = builder.payload(payload);
    }
    let task = builder.build()?;

    let runner = TaskRunner::from_config(config);
    runner.submit(task.clone())?;
    if let Some(after) = cancel_after {
        let task = Arc::clone(&task);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            task.cancel();
        });
    }
    runner.shutdown_and_join().await;

    // Finished 後なので、callback は呼ばれたか、もう呼ばれない（cancel が start より先）
    let report = match rx.try_recv() {
        Ok((success, error)) => serde_json::json!({
            "task_id": task.id().to_string(),
            "success": success,
            "error": error.map(|e| e.to_string()),
        }),
        Err(_) => serde_json::json!({
            "task_id": task.id().to_string(),
            "success": false,
            "error": "cancelled before start",
        }),
    };
    println!("{report}");
    Ok(())
}
