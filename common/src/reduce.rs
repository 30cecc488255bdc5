use crate::{
    codec::{self, PendingFile, ShardReader, ShardWriter},
    KeyValue, ReduceTask, Result,
};
use itertools::Itertools;
use std::{
    collections::HashMap,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Values per key for one reduce task, in arrival order.
#[derive(Debug, Default)]
pub struct Groups {
    by_key: HashMap<String, Vec<String>>,
    records: usize,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kv: KeyValue) {
        self.by_key.entry(kv.key).or_default().push(kv.value);
        self.records += 1;
    }

    /// Returns the number of records read.
    pub fn read_shard<R: Read>(&mut self, shard: ShardReader<R>) -> Result<usize> {
        let mut n = 0;
        for kv in shard {
            self.insert(kv?);
            n += 1;
        }
        Ok(n)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn records(&self) -> usize {
        self.records
    }

    /// Keys in ascending byte order, each with its values sorted.
    pub fn into_sorted(self) -> impl Iterator<Item = (String, Vec<String>)> {
        self.by_key
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .map(|(key, mut values)| {
                values.sort();
                (key, values)
            })
    }
}

impl Extend<KeyValue> for Groups {
    fn extend<T: IntoIterator<Item = KeyValue>>(&mut self, iter: T) {
        for kv in iter {
            self.insert(kv);
        }
    }
}

/// Opens and drains every shard, in the order given. The first missing or
/// malformed shard aborts the read; each shard is closed before the next opens.
pub fn read_groups<P: AsRef<Path>>(paths: &[P]) -> Result<Groups> {
    let mut groups = Groups::new();
    for path in paths {
        let shard = codec::open_shard(path.as_ref())?;
        let n = groups.read_shard(shard)?;
        debug!("read {} records from {}", n, path.as_ref().display());
    }
    Ok(groups)
}

pub fn write_reduced<W, F>(groups: Groups, reducef: F, out: &mut ShardWriter<W>) -> Result<usize>
where
    W: Write,
    F: Fn(&str, Vec<String>) -> String,
{
    let mut keys = 0;
    for (key, values) in groups.into_sorted() {
        let value = reducef(&key, values);
        out.write(&KeyValue { key, value })?;
        keys += 1;
    }
    Ok(keys)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceSummary {
    pub records: usize,
    pub keys: usize,
    pub output: PathBuf,
}

/// Reads every shard before creating the output; a failed task leaves no output.
pub fn do_reduce<F>(task: &ReduceTask, reducef: F) -> Result<ReduceSummary>
where
    F: Fn(&str, Vec<String>) -> String,
{
    info!(
        "reduce: job = {}, task = {}, n_map = {}, output = {}",
        task.job_name,
        task.index,
        task.n_map,
        task.output_path().display()
    );

    let result = reduce_inner(task, reducef);
    match &result {
        Ok(summary) => info!(
            "reduce task {} done: {} records, {} keys",
            task.index, summary.records, summary.keys
        ),
        Err(e) => warn!("reduce task {} failed: {}", task.index, e),
    }
    result
}

fn reduce_inner<F>(task: &ReduceTask, reducef: F) -> Result<ReduceSummary>
where
    F: Fn(&str, Vec<String>) -> String,
{
    let groups = read_groups(&task.input_paths())?;
    let records = groups.records();

    let mut pending = PendingFile::create(task.output_path())?;
    let mut writer = ShardWriter::new(pending.target().to_path_buf(), &mut pending);
    let keys = write_reduced(groups, reducef, &mut writer)?;
    writer.finish()?;
    let output = pending.commit()?;

    Ok(ReduceSummary {
        records,
        keys,
        output,
    })
}
