use std::{io, path::PathBuf};

/// Every failure is fatal to the task that hit it; the caller re-runs the task.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid task: {0}")]
    InvalidTask(String),
}

impl Error {
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_resource() {
        let err = Error::file_access(
            "mrtmp.ii-3-0",
            io::Error::new(io::ErrorKind::NotFound, "No such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("mrtmp.ii-3-0"), "{msg}");
        assert!(msg.starts_with("unable to access"), "{msg}");
    }
}
