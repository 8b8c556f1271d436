use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use common::store;
use common::MapFn;
use tracing::info;

/// One map task: read the whole input, run the user map function, and write
/// one intermediate file per reduce partition. Re-running the same task
/// truncates and rewrites its files, so a timed-out duplicate converges on
/// the same content.
pub fn run_map_task(
    map_fn: MapFn,
    dir: &Path,
    task: u32,
    input: &str,
    n_reduce: u32,
) -> Result<()> {
    info!("map task {} on `{}`", task, input);

    let contents =
        fs::read_to_string(input).with_context(|| format!("cannot read input `{}`", input))?;

    let records = map_fn(input, &contents);
    info!("map task {} produced {} records", task, records.len());

    store::write_map_partitions(dir, task, records, n_reduce)
        .with_context(|| format!("cannot write intermediate files for map task {}", task))?;

    Ok(())
}
