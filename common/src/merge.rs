use crate::{
    codec::{self, PendingFile},
    naming, Error, Result,
};
use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

/// Combines the outputs of all `n_reduce` reduce tasks into one `key: value`
/// text file, keys ascending.
pub fn merge(job_name: &str, n_reduce: usize, work_dir: &Path) -> Result<PathBuf> {
    let mut kvs = BTreeMap::new();
    for r in 0..n_reduce {
        let path = work_dir.join(naming::merge_name(job_name, r));
        for kv in codec::open_shard(&path)? {
            let kv = kv?;
            kvs.insert(kv.key, kv.value);
        }
    }

    let target = work_dir.join(naming::result_name(job_name));
    let mut pending = PendingFile::create(&target)?;
    for (key, value) in &kvs {
        writeln!(pending, "{key}: {value}").map_err(|e| Error::write(&target, e))?;
    }
    let output = pending.commit()?;
    info!("merge: {} keys into {}", kvs.len(), output.display());
    Ok(output)
}
