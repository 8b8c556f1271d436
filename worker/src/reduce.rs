use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use common::store;
use common::ReduceFn;
use tracing::info;

/// One reduce task: gather this partition's records from every map task,
/// sort them by key, group runs of equal keys, and write one
/// `"<key> <output>\n"` line per distinct key in ascending key order.
///
/// Every (map, partition) file must exist by the time this runs; the
/// coordinator only hands out reduce work once all map tasks are finished,
/// and map tasks create their files even for empty buckets.
pub fn run_reduce_task(reduce_fn: ReduceFn, dir: &Path, task: u32, n_map: u32) -> Result<()> {
    info!("reduce task {} over {} map outputs", task, n_map);

    let mut records = Vec::new();
    for m in 0..n_map {
        let path = store::partition_path(dir, m, task);
        let mut part = store::read_partition(&path)
            .with_context(|| format!("cannot read partition file {}", path.display()))?;
        records.append(&mut part);
    }

    records.sort_by(|a, b| a.key.cmp(&b.key));

    let out_path = store::output_path(dir, task);
    let file = File::create(&out_path)
        .with_context(|| format!("cannot create output file {}", out_path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut i = 0;
    while i < records.len() {
        let mut j = i + 1;
        while j < records.len() && records[j].key == records[i].key {
            j += 1;
        }

        let values: Vec<String> = records[i..j].iter().map(|kv| kv.value.clone()).collect();
        let output = reduce_fn(&records[i].key, &values);
        writeln!(writer, "{} {}", records[i].key, output)?;

        i = j;
    }

    writer.flush()?;
    Ok(())
}
