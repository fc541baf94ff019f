use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use ts_model::TimesliceBuffer;

use crate::error::IoError;
use crate::schema_info::RawBranchInfo;
use crate::traits::{ContainerReader, ContainerWriter};

/// A self-contained stand-in for the "binary container" `spec.md` treats as
/// an opaque external library: a file holding a length-prefixed
/// [`bincode`]-serialized branch schema followed by one length-prefixed
/// entry per timeslice/event.
///
/// This is the default backend used by the test suite and the CLI. It is
/// not zero-copy — `read_entry` clones a pre-loaded entry rather than
/// reading bytes directly into `into`'s slots — because there is no shared
/// on-disk layout to exploit; a production adapter backed by a real
/// columnar container would avoid that clone.
pub struct BincodeContainerReader {
    path: PathBuf,
    branches: Vec<RawBranchInfo>,
    entries: Vec<TimesliceBuffer>,
}

fn open_err(path: &Path, source: std::io::Error) -> IoError {
    IoError::Open {
        path: path.display().to_string(),
        source,
    }
}

fn read_err(path: &Path, entry: u64, source: std::io::Error) -> IoError {
    IoError::Read {
        path: path.display().to_string(),
        entry,
        source,
    }
}

fn corrupt(path: &Path, reason: impl Into<String>) -> IoError {
    IoError::Corrupt {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn read_frame(r: &mut impl Read, path: &Path, entry: u64) -> Result<Vec<u8>, IoError> {
    let mut len_bytes = [0u8; 8];
    r.read_exact(&mut len_bytes)
        .map_err(|e| read_err(path, entry, e))?;
    let len = u64::from_le_bytes(len_bytes) as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(|e| read_err(path, entry, e))?;
    Ok(buf)
}

fn write_frame(w: &mut impl Write, path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    w.write_all(&(bytes.len() as u64).to_le_bytes())
        .map_err(|e| IoError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
    w.write_all(bytes).map_err(|e| IoError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

impl BincodeContainerReader {
    /// Open `path`, reading the schema header and pre-loading every entry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| open_err(&path, e))?;
        let mut reader = BufReader::new(file);

        let header_bytes = read_frame(&mut reader, &path, 0)?;
        let branches: Vec<RawBranchInfo> = bincode::deserialize(&header_bytes)
            .map_err(|e| corrupt(&path, format!("schema header: {e}")))?;

        let mut entries = Vec::new();
        loop {
            let mut probe = [0u8; 8];
            match reader.read(&mut probe) {
                Ok(0) => break,
                Ok(n) if n < 8 => {
                    return Err(corrupt(&path, "truncated entry length prefix"));
                }
                Ok(_) => {
                    let len = u64::from_le_bytes(probe) as usize;
                    let mut buf = vec![0u8; len];
                    reader
                        .read_exact(&mut buf)
                        .map_err(|e| read_err(&path, entries.len() as u64, e))?;
                    let entry: TimesliceBuffer = bincode::deserialize(&buf)
                        .map_err(|e| corrupt(&path, format!("entry {}: {e}", entries.len())))?;
                    entries.push(entry);
                }
                Err(e) => return Err(read_err(&path, entries.len() as u64, e)),
            }
        }

        Ok(Self {
            path,
            branches,
            entries,
        })
    }
}

impl ContainerReader for BincodeContainerReader {
    fn branch_schema(&self) -> &[RawBranchInfo] {
        &self.branches
    }

    fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    fn read_entry(&mut self, index: u64, into: &mut TimesliceBuffer) -> Result<(), IoError> {
        let entry = self
            .entries
            .get(index as usize)
            .ok_or_else(|| read_err(&self.path, index, std::io::ErrorKind::UnexpectedEof.into()))?;
        *into = entry.clone();
        Ok(())
    }
}

/// Write side of [`BincodeContainerReader`]'s format.
pub struct BincodeContainerWriter {
    path: PathBuf,
    file: BufWriter<File>,
    metadata_written: bool,
}

impl BincodeContainerWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| open_err(&path, e))?;
        Ok(Self {
            path,
            file: BufWriter::new(file),
            metadata_written: false,
        })
    }
}

impl ContainerWriter for BincodeContainerWriter {
    fn clone_metadata(&mut self, schema: &[RawBranchInfo]) -> Result<(), IoError> {
        let bytes = bincode::serialize(&schema.to_vec())
            .map_err(|e| corrupt(&self.path, format!("schema header: {e}")))?;
        write_frame(&mut self.file, &self.path, &bytes)?;
        self.metadata_written = true;
        Ok(())
    }

    fn write_entry(&mut self, buffer: &TimesliceBuffer) -> Result<(), IoError> {
        if !self.metadata_written {
            return Err(corrupt(
                &self.path,
                "clone_metadata must run before the first write_entry",
            ));
        }
        let bytes = bincode::serialize(buffer)
            .map_err(|e| corrupt(&self.path, format!("entry: {e}")))?;
        write_frame(&mut self.file, &self.path, &bytes)
    }
}
