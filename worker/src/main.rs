mod map;
mod reduce;
mod worker;

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Map/reduce worker: polls the coordinator for work until told to exit.
/// Exits 0 when the job is over, 1 on any unrecoverable failure.
#[derive(Parser)]
#[command(name = "worker")]
struct Args {
    /// Workload to run; every worker in a job must pick the same one.
    #[arg(long, default_value = "wordcount")]
    workload: String,

    /// Coordinator base URL. Overrides COORDINATOR_URL.
    #[arg(long)]
    coordinator: Option<String>,

    /// Directory for intermediate partition files and final outputs; must
    /// be shared by every worker in the job.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

/// Flag first, then COORDINATOR_URL, then the local default.
fn coordinator_base_url(flag: Option<String>) -> String {
    flag.or_else(|| env::var("COORDINATOR_URL").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("worker=debug,reqwest=info")
        .init();

    let args = Args::parse();
    let base_url = coordinator_base_url(args.coordinator);

    let Some(workload) = common::workload::by_name(&args.workload) else {
        bail!("unknown workload `{}`", args.workload);
    };

    worker::run(&base_url, workload, &args.dir).await
}
