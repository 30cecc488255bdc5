use crate::{
    codec::{PendingFile, ShardWriter},
    naming, Error, KeyValue, MapTask, Result,
};
use std::{fs, path::PathBuf};
use tracing::info;

/// Writes all `n_reduce` shards, empty ones included.
pub fn do_map<F>(task: &MapTask, mapf: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&str, &str) -> Vec<KeyValue>,
{
    if task.n_reduce == 0 {
        return Err(Error::InvalidTask(format!(
            "map task {} has no reduce tasks to partition into",
            task.index
        )));
    }
    let contents =
        fs::read_to_string(&task.input).map_err(|e| Error::file_access(&task.input, e))?;
    let filename = task.document_id();
    let kva = mapf(&filename, &contents);
    info!(
        "map: job = {}, task = {}, input = {}, {} records",
        task.job_name,
        task.index,
        filename,
        kva.len()
    );

    let mut partitions: Vec<Vec<KeyValue>> = vec![Vec::new(); task.n_reduce];
    for kv in kva {
        partitions[naming::partition(&kv.key, task.n_reduce)].push(kv);
    }

    let mut outputs = Vec::with_capacity(task.n_reduce);
    for (reduce_task, kvs) in partitions.into_iter().enumerate() {
        let path = task.output_path(reduce_task);
        let mut pending = PendingFile::create(&path)?;
        let mut writer = ShardWriter::new(&path, &mut pending);
        for kv in &kvs {
            writer.write(kv)?;
        }
        writer.finish()?;
        outputs.push(pending.commit()?);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::open_shard, ReduceTask};

    fn words(_filename: &str, contents: &str) -> Vec<KeyValue> {
        contents
            .split_whitespace()
            .map(|w| KeyValue::new(w, "1"))
            .collect()
    }

    #[test]
    fn writes_one_shard_per_reduce_task() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        fs::write(&input, "a b c d e f a").unwrap();
        let task = MapTask {
            job_name: "test".into(),
            index: 0,
            n_reduce: 4,
            work_dir: dir.path().to_path_buf(),
            input,
        };

        let outputs = do_map(&task, words).unwrap();
        assert_eq!(outputs.len(), 4);

        let mut total = 0;
        for (r, path) in outputs.iter().enumerate() {
            assert_eq!(path, &ReduceTask::new("test", r, 1, dir.path()).input_paths()[0]);
            for kv in open_shard(path).unwrap() {
                let kv = kv.unwrap();
                assert_eq!(naming::partition(&kv.key, 4), r);
                total += 1;
            }
        }
        assert_eq!(total, 7);
    }

    #[test]
    fn zero_reduce_tasks_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        fs::write(&input, "a b").unwrap();
        let task = MapTask {
            job_name: "test".into(),
            index: 0,
            n_reduce: 0,
            work_dir: dir.path().to_path_buf(),
            input,
        };
        assert!(matches!(do_map(&task, words), Err(Error::InvalidTask(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_input_is_a_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let task = MapTask {
            job_name: "test".into(),
            index: 0,
            n_reduce: 2,
            work_dir: dir.path().to_path_buf(),
            input: dir.path().join("absent.txt"),
        };
        assert!(matches!(do_map(&task, words), Err(Error::FileAccess { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
