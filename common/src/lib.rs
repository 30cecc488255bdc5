use serde::{Deserialize, Serialize};
use std::fmt;

pub mod codec;
pub mod error;
pub mod logging;
pub mod map;
pub mod merge;
pub mod naming;
pub mod reduce;
pub mod task;

pub use error::{Error, Result};
pub use logging::init_logger;
pub use task::{MapTask, ReduceTask};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// `map(source_name, contents)`, emitted records in no particular order.
pub type MapFn = fn(filename: &str, contents: &str) -> Vec<KeyValue>;
/// `reduce(key, values)`, values already sorted. Must be pure.
pub type ReduceFn = fn(key: &str, values: Vec<String>) -> String;

#[derive(Clone, Copy)]
pub struct App {
    pub name: &'static str,
    pub map: MapFn,
    pub reduce: ReduceFn,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App").field("name", &self.name).finish()
    }
}
