mod handlers;
mod ledger;
mod state;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::ledger::Ledger;
use crate::state::AppState;

/// Coordinator for a two-phase map/reduce job. Holds every task's status in
/// memory, hands work to polling workers, and exits once both phases are
/// complete.
#[derive(Parser)]
#[command(name = "coordinator")]
struct Args {
    /// Input files for the map phase; each argument may be a literal path
    /// or a glob pattern. One map task per matched file.
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<String>,

    /// Number of reduce tasks (and final output partitions).
    #[arg(long, default_value_t = 8)]
    n_reduce: u32,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

/// Expands every input argument through glob. A pattern that matches no
/// file is a startup error, not an empty map phase.
fn expand_inputs(patterns: &[String]) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let entries =
            glob::glob(pattern).with_context(|| format!("invalid input pattern `{}`", pattern))?;

        let before = files.len();
        for entry in entries {
            let path = entry?;
            if path.is_file() {
                files.push(path.to_string_lossy().to_string());
            }
        }
        if files.len() == before {
            bail!("input pattern `{}` matched no files", pattern);
        }
    }

    Ok(files)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("coordinator=debug,tower_http=info")
        .init();

    let args = Args::parse();
    if args.n_reduce == 0 {
        bail!("--n-reduce must be at least 1");
    }
    let inputs = expand_inputs(&args.inputs)?;

    info!(
        "job has {} map tasks and {} reduce tasks",
        inputs.len(),
        args.n_reduce
    );

    let state = AppState::new(Ledger::new(inputs, args.n_reduce));
    let app = handlers::build_router(state.clone());

    // cannot bind: fatal, nothing to recover into
    let listener = TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("cannot bind port {}", args.port))?;
    info!("coordinator listening on {}", listener.local_addr()?);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("server error: {}", e);
        }
    });

    // Driver loop: the coordinator process lives exactly as long as the job.
    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        if state.ledger.lock().unwrap().done() {
            break;
        }
    }

    info!("all tasks finished");
    // keep serving briefly so in-flight pollers receive their Exit
    tokio::time::sleep(Duration::from_secs(2)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(sub: &str) -> PathBuf {
        let base = std::env::temp_dir().join("coordinator_main_tests").join(sub);
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(&base).unwrap();
        base
    }

    #[test]
    fn expand_inputs_accepts_literal_paths() {
        let tmp = temp_dir("literal");
        let file = tmp.join("input.txt");
        fs::write(&file, "hello").unwrap();

        let files = expand_inputs(&[file.to_string_lossy().to_string()]).unwrap();
        assert_eq!(files, vec![file.to_string_lossy().to_string()]);
    }

    #[test]
    fn expand_inputs_expands_glob_patterns() {
        let tmp = temp_dir("globbed");
        fs::write(tmp.join("a.txt"), "a").unwrap();
        fs::write(tmp.join("b.txt"), "b").unwrap();
        fs::write(tmp.join("skip.dat"), "x").unwrap();

        let pattern = tmp.join("*.txt").to_string_lossy().to_string();
        let files = expand_inputs(&[pattern]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.ends_with(".txt")));
    }

    #[test]
    fn expand_inputs_rejects_patterns_without_matches() {
        let tmp = temp_dir("empty");
        let pattern = tmp.join("*.txt").to_string_lossy().to_string();
        assert!(expand_inputs(&[pattern]).is_err());
    }
}
