use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use common::{PollRequest, PollResponse, TaskAssignment, TaskReport, Workload};
use reqwest::Client;
use tokio::time::sleep;
use tracing::info;

use crate::{map, reduce};

/// How long to wait after a Retry answer before polling again.
const RETRY_SLEEP: Duration = Duration::from_secs(1);

/// The worker loop: report the previous result, receive the next task,
/// execute it, repeat. The only state carried between iterations is the
/// report for what just finished.
///
/// Errors propagate out of here and kill the process. That is deliberate:
/// a failed call means the coordinator is gone (job over or crashed, the
/// worker cannot tell which), and a failed executor leaves a task slot the
/// coordinator will re-issue to someone else after the timeout.
pub async fn run(base_url: &str, workload: Workload, dir: &Path) -> Result<()> {
    let client = Client::new();

    let host = hostname::get()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    info!(
        "worker on {} polling {} with workload `{}`",
        host, base_url, workload.name
    );

    let poll_url = format!("{}/api/v1/tasks/poll", base_url);
    let mut report = TaskReport::None;

    loop {
        let assignment = poll(&client, &poll_url, report)
            .await
            .context("coordinator unreachable")?;

        report = match assignment {
            TaskAssignment::Exit => {
                info!("job complete, exiting");
                return Ok(());
            }
            TaskAssignment::Map {
                task,
                input,
                n_reduce,
            } => {
                map::run_map_task(workload.map, dir, task, &input, n_reduce)
                    .with_context(|| format!("map task {} failed on `{}`", task, input))?;
                TaskReport::Map { task }
            }
            TaskAssignment::Reduce { task, n_map } => {
                reduce::run_reduce_task(workload.reduce, dir, task, n_map)
                    .with_context(|| format!("reduce task {} failed", task))?;
                TaskReport::Reduce { task }
            }
            TaskAssignment::Retry => {
                sleep(RETRY_SLEEP).await;
                TaskReport::None
            }
        };
    }
}

async fn poll(client: &Client, url: &str, report: TaskReport) -> Result<TaskAssignment> {
    let response = client
        .post(url)
        .json(&PollRequest { report })
        .send()
        .await?
        .error_for_status()?;

    let body: PollResponse = response.json().await?;
    Ok(body.assignment)
}
