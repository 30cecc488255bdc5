//! File names shared by the map-side writer and the reduce-side reader.

use std::hash::Hasher;

const PREFIX: &str = "mrtmp.";

pub fn reduce_name(job_name: &str, map_task: usize, reduce_task: usize) -> String {
    format!("{PREFIX}{job_name}-{map_task}-{reduce_task}")
}

pub fn merge_name(job_name: &str, reduce_task: usize) -> String {
    format!("{PREFIX}{job_name}-res-{reduce_task}")
}

pub fn result_name(job_name: &str) -> String {
    format!("{PREFIX}{job_name}")
}

/// Low 31 bits of the 64-bit FNV-1a hash of the key.
pub fn ihash(key: &str) -> u32 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(key.as_bytes());
    (hasher.finish() as u32) & 0x7fff_ffff
}

/// Panics if `n_reduce` is zero.
pub fn partition(key: &str, n_reduce: usize) -> usize {
    ihash(key) as usize % n_reduce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(reduce_name("iiseq", 2, 1), "mrtmp.iiseq-2-1");
        assert_eq!(merge_name("iiseq", 1), "mrtmp.iiseq-res-1");
        assert_eq!(result_name("iiseq"), "mrtmp.iiseq");
    }

    #[test]
    fn partition_is_stable_and_in_range() {
        for key in ["a", "b", "cat", "The", "CAT", ""] {
            let p = partition(key, 3);
            assert!(p < 3);
            assert_eq!(p, partition(key, 3));
        }
        assert!(ihash("anything") <= 0x7fff_ffff);
    }
}
