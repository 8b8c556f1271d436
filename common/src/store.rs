use serde::{Deserialize, Serialize};
use std::{
    collections::hash_map::DefaultHasher,
    fs::{self, File},
    hash::{Hash, Hasher},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// One intermediate record, produced by a map task and consumed by exactly
/// one reduce task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// Reduce-task index a key is routed to. Every map task must route the same
/// key to the same partition, so this has to be deterministic for a fixed
/// reduce count.
pub fn partition_for_key(key: &str, n_reduce: u32) -> u32 {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    (h.finish() % n_reduce as u64) as u32
}

/// Intermediate file holding what map task `map_task` produced for
/// partition `reduce_task`.
pub fn partition_path(dir: &Path, map_task: u32, reduce_task: u32) -> PathBuf {
    dir.join(format!("part-{}-{}.jsonl", map_task, reduce_task))
}

/// Final output file for one reduce task.
pub fn output_path(dir: &Path, reduce_task: u32) -> PathBuf {
    dir.join(format!("out-{}", reduce_task))
}

/// Routes `records` into `n_reduce` buckets by key hash and writes one
/// partition file per bucket, one JSON record per line.
///
/// All `n_reduce` files are created, empty buckets included, and any file
/// from an earlier attempt of the same map task is truncated. The reduce
/// side can therefore rely on every (map, partition) file existing.
pub fn write_map_partitions(
    dir: &Path,
    map_task: u32,
    records: Vec<KeyValue>,
    n_reduce: u32,
) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    let mut writers: Vec<BufWriter<File>> = Vec::with_capacity(n_reduce as usize);
    for r in 0..n_reduce {
        let file = File::create(partition_path(dir, map_task, r))?;
        writers.push(BufWriter::new(file));
    }

    for kv in records {
        let r = partition_for_key(&kv.key, n_reduce) as usize;
        serde_json::to_writer(&mut writers[r], &kv)?;
        writers[r].write_all(b"\n")?;
    }

    for w in writers.iter_mut() {
        w.flush()?;
    }

    Ok(())
}

/// Reads one partition file back into memory. Records were written one per
/// line, so each line decodes independently.
pub fn read_partition(path: &Path) -> io::Result<Vec<KeyValue>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let kv: KeyValue = serde_json::from_str(&line)?;
        out.push(kv);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(sub: &str) -> PathBuf {
        let base = std::env::temp_dir().join("store_tests").join(sub);
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(&base).unwrap();
        base
    }

    fn kv(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn partition_for_key_stays_in_range() {
        let n = 10;
        for key in ["a", "b", "c", "xyz", "another"] {
            assert!(partition_for_key(key, n) < n);
        }
    }

    #[test]
    fn partition_for_key_is_deterministic() {
        for key in ["apple", "banana", "cherry"] {
            assert_eq!(partition_for_key(key, 7), partition_for_key(key, 7));
        }
    }

    #[test]
    fn write_map_partitions_creates_every_file() {
        let tmp = temp_dir("all_files");

        // one record cannot fill three buckets, the others stay empty
        write_map_partitions(&tmp, 0, vec![kv("only", "1")], 3).unwrap();

        for r in 0..3 {
            let path = partition_path(&tmp, 0, r);
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[test]
    fn write_map_partitions_routes_by_key_hash() {
        let tmp = temp_dir("routing");
        let n_reduce = 4;

        let records = vec![
            kv("alpha", "1"),
            kv("beta", "1"),
            kv("gamma", "1"),
            kv("alpha", "2"),
        ];
        write_map_partitions(&tmp, 2, records.clone(), n_reduce).unwrap();

        let mut seen = Vec::new();
        for r in 0..n_reduce {
            let part = read_partition(&partition_path(&tmp, 2, r)).unwrap();
            for record in part {
                assert_eq!(partition_for_key(&record.key, n_reduce), r);
                seen.push(record);
            }
        }

        seen.sort_by(|a, b| (&a.key, &a.value).cmp(&(&b.key, &b.value)));
        let mut expected = records;
        expected.sort_by(|a, b| (&a.key, &a.value).cmp(&(&b.key, &b.value)));
        assert_eq!(seen, expected);
    }

    #[test]
    fn write_map_partitions_truncates_previous_attempt() {
        let tmp = temp_dir("truncate");

        write_map_partitions(&tmp, 0, vec![kv("old", "1"), kv("stale", "1")], 1).unwrap();
        write_map_partitions(&tmp, 0, vec![kv("new", "1")], 1).unwrap();

        let part = read_partition(&partition_path(&tmp, 0, 0)).unwrap();
        assert_eq!(part, vec![kv("new", "1")]);
    }

    #[test]
    fn read_partition_skips_blank_lines() {
        let tmp = temp_dir("blank_lines");
        let path = tmp.join("part.jsonl");
        fs::write(&path, "{\"key\":\"a\",\"value\":\"1\"}\n\n{\"key\":\"b\",\"value\":\"2\"}\n").unwrap();

        let part = read_partition(&path).unwrap();
        assert_eq!(part, vec![kv("a", "1"), kv("b", "2")]);
    }

    #[test]
    fn read_partition_missing_file_is_an_error() {
        let tmp = temp_dir("missing");
        assert!(read_partition(&tmp.join("nope.jsonl")).is_err());
    }
}
