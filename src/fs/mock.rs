// src/fs/mock.rs

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::FileStat;

/// In-memory filesystem with settable modification times.
///
/// `touch` stamps files with a monotonically increasing synthetic clock, so
/// tests can express "a was created before b" without real sleeps. Cloning
/// shares the underlying state, which lets a test keep a handle while the
/// graph owns the `Arc<dyn FileStat>`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<PathBuf, SystemTime>,
    ticks: u64,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or re-stamp a file at the next clock tick.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.lock().unwrap();
        inner.ticks += 1;
        let stamp = UNIX_EPOCH + Duration::from_secs(inner.ticks);
        inner.files.insert(path.as_ref().to_path_buf(), stamp);
    }

    /// Create or re-stamp several files at the *same* clock tick.
    pub fn touch_all<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut inner = self.inner.lock().unwrap();
        inner.ticks += 1;
        let stamp = UNIX_EPOCH + Duration::from_secs(inner.ticks);
        for path in paths {
            inner.files.insert(path.as_ref().to_path_buf(), stamp);
        }
    }

    /// Create or re-stamp a file at an explicit mtime.
    pub fn touch_at(&self, path: impl AsRef<Path>, mtime: SystemTime) {
        let mut inner = self.inner.lock().unwrap();
        inner.files.insert(path.as_ref().to_path_buf(), mtime);
    }

    /// Remove a file.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.lock().unwrap();
        inner.files.remove(path.as_ref());
    }
}

impl FileStat for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.files.contains_key(path)
    }

    fn mtime(&self, path: &Path) -> io::Result<SystemTime> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(path).copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path:?}"))
        })
    }
}
