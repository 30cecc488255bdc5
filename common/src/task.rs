use crate::naming;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MapTask {
    pub job_name: String,
    pub index: usize,
    pub n_reduce: usize,
    pub work_dir: PathBuf,
    pub input: PathBuf,
}

impl MapTask {
    /// The input path as given.
    pub fn document_id(&self) -> String {
        self.input.to_string_lossy().into_owned()
    }

    pub fn output_path(&self, reduce_task: usize) -> PathBuf {
        self.work_dir
            .join(naming::reduce_name(&self.job_name, self.index, reduce_task))
    }
}

#[derive(Debug, Clone)]
pub struct ReduceTask {
    pub job_name: String,
    pub index: usize,
    pub n_map: usize,
    pub work_dir: PathBuf,
}

impl ReduceTask {
    pub fn new(job_name: &str, index: usize, n_map: usize, work_dir: impl AsRef<Path>) -> Self {
        Self {
            job_name: job_name.to_string(),
            index,
            n_map,
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    pub fn input_paths(&self) -> Vec<PathBuf> {
        (0..self.n_map)
            .map(|m| {
                self.work_dir
                    .join(naming::reduce_name(&self.job_name, m, self.index))
            })
            .collect()
    }

    pub fn output_path(&self) -> PathBuf {
        self.work_dir
            .join(naming::merge_name(&self.job_name, self.index))
    }
}
