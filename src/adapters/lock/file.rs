use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::LOCK_POLL_MS;
use crate::types::errors::{Error, ErrorKind, Result};
use fs2::FileExt;

use super::{LockGuard, LockManager};

/// Advisory `flock`-based run lock. The holder's pid is written into the file so a
/// second invocation can name who is blocking it.
#[derive(Debug)]
pub struct FileLockManager {
    path: PathBuf,
}

impl FileLockManager {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

struct FileGuard {
    file: File,
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
        let _ = self.file.unlock();
    }
}

impl LockGuard for FileGuard {}

fn holder_pid(file: &mut File) -> Option<String> {
    let mut s = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut s).ok()?;
    let pid = s.trim();
    (!pid.is_empty()).then(|| pid.to_string())
}

impl LockManager for FileLockManager {
    fn acquire_run_lock(&self, timeout_ms: u64) -> Result<Box<dyn LockGuard>> {
        let t0 = Instant::now();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    file.set_len(0)?;
                    file.seek(SeekFrom::Start(0))?;
                    write!(file, "{}", std::process::id())?;
                    file.flush()?;
                    return Ok(Box::new(FileGuard { file }));
                }
                Err(_e) => {
                    if t0.elapsed() >= Duration::from_millis(timeout_ms) {
                        let who = holder_pid(&mut file)
                            .map_or_else(String::new, |pid| format!(" (held by pid {pid})"));
                        return Err(Error::new(
                            ErrorKind::Policy,
                            format!(
                                "another conversion is already running{who}; lock file {}",
                                self.path.display()
                            ),
                        ));
                    }
                    thread::sleep(Duration::from_millis(LOCK_POLL_MS));
                }
            }
        }
    }
}
