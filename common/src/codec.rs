//! Newline-delimited JSON framing for intermediate shards and reduce outputs.
//!
//! A shard is a run of self-describing `{"Key":..,"Value":..}` objects, so it is
//! decoded one record at a time with no length prefix for the whole file.

use crate::{Error, KeyValue, Result};
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};
use tracing::debug;
use uuid::Uuid;

/// Streaming decoder over one shard. Stops after the first error.
pub struct ShardReader<R: Read> {
    path: PathBuf,
    records: StreamDeserializer<'static, IoRead<R>, KeyValue>,
}

impl<R: Read> ShardReader<R> {
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            records: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Read> Iterator for ShardReader<R> {
    type Item = Result<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.records.next()?;
        Some(item.map_err(|e| {
            if e.is_io() {
                Error::file_access(&self.path, io::Error::from(e))
            } else {
                Error::decode(&self.path, e)
            }
        }))
    }
}

/// Opens a shard read-only. The file is closed when the reader is dropped.
pub fn open_shard(path: &Path) -> Result<ShardReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
    debug!("opened shard {}", path.display());
    Ok(ShardReader::new(path, BufReader::new(file)))
}

pub struct ShardWriter<W: Write> {
    path: PathBuf,
    inner: W,
    written: usize,
}

impl<W: Write> ShardWriter<W> {
    pub fn new(path: impl Into<PathBuf>, inner: W) -> Self {
        Self {
            path: path.into(),
            inner,
            written: 0,
        }
    }

    pub fn write(&mut self, kv: &KeyValue) -> Result<()> {
        serde_json::to_writer(&mut self.inner, kv)
            .map_err(|e| Error::write(&self.path, io::Error::from(e)))?;
        self.inner
            .write_all(b"\n")
            .map_err(|e| Error::write(&self.path, e))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.inner.flush().map_err(|e| Error::write(&self.path, e))?;
        Ok(self.inner)
    }
}

/// A file written under a temporary name next to its target and renamed onto
/// the target by [`PendingFile::commit`]. Dropping it uncommitted removes the
/// temporary, so the target is either absent, untouched, or complete.
pub struct PendingFile {
    target: PathBuf,
    temp: PathBuf,
    file: Option<BufWriter<File>>,
    committed: bool,
}

impl PendingFile {
    pub fn create(target: impl Into<PathBuf>) -> Result<Self> {
        let target = target.into();
        let temp = temp_path(&target);
        let file = File::create(&temp).map_err(|e| Error::write(&target, e))?;
        Ok(Self {
            target,
            temp,
            file: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn commit(mut self) -> Result<PathBuf> {
        let Some(writer) = self.file.take() else {
            return Err(Error::write(
                &self.target,
                io::Error::new(io::ErrorKind::Other, "pending file already closed"),
            ));
        };
        let file = writer
            .into_inner()
            .map_err(|e| Error::write(&self.target, e.into_error()))?;
        file.sync_all().map_err(|e| Error::write(&self.target, e))?;
        drop(file);
        fs::rename(&self.temp, &self.target).map_err(|e| Error::write(&self.target, e))?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Write for PendingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "pending file closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.committed {
            drop(self.file.take());
            let _ = fs::remove_file(&self.temp);
        }
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}
