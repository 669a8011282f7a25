// File: src/persistence.rs
use crate::cache::CacheStore;
use crate::errors::CacheError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;

/// On-disk form of one cache entry.
#[derive(serde::Serialize, serde::Deserialize)]
struct StoredRecord {
    expires_at_ms: u64,
    value: Vec<u8>,
}

/// A cache store that keeps one bincode file per key under a directory, so
/// entries survive process restarts. Writes go through a temp file in the same
/// directory and are renamed into place, so readers never see a torn record.
pub struct DiskCacheStore {
    dir: PathBuf,
}

impl DiskCacheStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Keys are hashed so arbitrary key text maps to a safe file name.
    fn entry_path(&self, key: &str) -> PathBuf {
        let name = blake3::hash(key.as_bytes()).to_hex();
        self.dir.join(format!("{}.bin", name))
    }

    /// Deletes every expired entry file. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = now_ms()?;
        let mut removed = 0;
        for dirent in fs::read_dir(&self.dir)? {
            let path = dirent?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("bin") {
                continue;
            }
            match read_record(&path) {
                Ok(Some(record)) if record.expires_at_ms > now => {}
                Ok(None) => {}
                _ => {
                    remove_quietly(&path);
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

impl CacheStore for DiskCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        let record = match read_record(&path) {
            Ok(record) => record,
            Err(e @ CacheError::Codec(_)) => {
                remove_quietly(&path);
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        match record {
            Some(record) if record.expires_at_ms > now_ms()? => Ok(Some(record.value)),
            Some(_) => {
                remove_quietly(&path);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let record = StoredRecord {
            expires_at_ms: now_ms()?.saturating_add(ttl_ms),
            value,
        };

        let temp_file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            bincode::serialize_into(&mut writer, &record)?;
            writer.flush()?;
        }
        temp_file.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

fn read_record(path: &Path) -> Result<Option<StoredRecord>, CacheError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let record = bincode::deserialize_from(BufReader::new(file))?;
    Ok(Some(record))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove cache file");
        }
    }
}

fn now_ms() -> Result<u64, CacheError> {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CacheError::Unavailable(format!("system clock before epoch: {}", e)))?;
    Ok(u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX))
}
