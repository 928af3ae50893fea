//! File snapshots taken before a file is modified or created.
//!
//! A snapshot is a copy in the backup directory plus a JSON sidecar carrying the
//! original path and the SHA-256 of the copy. Restore verifies the digest before
//! putting the bytes back. A file that did not exist at snapshot time is deleted on
//! restore.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::RestorableChange;
use crate::types::{Error, ErrorKind, Result};

#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    original: String,
    sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Captured {
    Absent,
    Saved { copy: PathBuf, sidecar: PathBuf },
}

#[derive(Debug)]
pub struct RestorableFile {
    path: PathBuf,
    name: String,
    captured: Captured,
    restored: bool,
}

pub fn sha256_hex_of(path: &Path) -> Option<String> {
    let mut f = std::fs::File::open(path).ok()?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut f, &mut hasher).ok()?;
    Some(hex::encode(hasher.finalize()))
}

/// Stable backup file name: original basename plus a digest of the full path so two
/// files with the same basename do not collide.
fn backup_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned());
    let digest = hex::encode(Sha256::digest(path.to_string_lossy().as_bytes()));
    format!("{base}.{}.bak", &digest[..12])
}

impl RestorableFile {
    /// Snapshot `path` into `backup_dir`.
    ///
    /// # Errors
    /// Returns an `Io` error when the copy or its sidecar cannot be written.
    pub fn backup(path: impl Into<PathBuf>, backup_dir: &Path) -> Result<Self> {
        let path = path.into();
        let name = format!("file {}", path.display());
        if !path.exists() {
            return Ok(Self {
                path,
                name,
                captured: Captured::Absent,
                restored: false,
            });
        }
        std::fs::create_dir_all(backup_dir)?;
        let copy = backup_dir.join(backup_name(&path));
        std::fs::copy(&path, &copy)?;
        let sha256 = sha256_hex_of(&copy)
            .ok_or_else(|| Error::new(ErrorKind::Io, format!("unable to hash {}", copy.display())))?;
        let sidecar = copy.with_extension("bak.meta.json");
        let meta = Sidecar {
            original: path.display().to_string(),
            sha256,
        };
        let body = serde_json::to_vec_pretty(&meta)
            .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?;
        std::fs::write(&sidecar, body)?;
        Ok(Self {
            path,
            name,
            captured: Captured::Saved { copy, sidecar },
            restored: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file existed at snapshot time.
    #[must_use]
    pub fn existed(&self) -> bool {
        matches!(self.captured, Captured::Saved { .. })
    }
}

impl RestorableChange for RestorableFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        match &self.captured {
            Captured::Absent => match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
            Captured::Saved { copy, sidecar } => {
                let raw = std::fs::read(sidecar)?;
                let meta: Sidecar = serde_json::from_slice(&raw)
                    .map_err(|e| Error::new(ErrorKind::Io, format!("corrupt sidecar: {e}")))?;
                if sha256_hex_of(copy).as_deref() != Some(meta.sha256.as_str()) {
                    return Err(Error::new(
                        ErrorKind::Io,
                        format!("backup payload hash mismatch for {}", self.path.display()),
                    ));
                }
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(copy, &self.path)?;
                let _ = std::fs::remove_file(copy);
                let _ = std::fs::remove_file(sidecar);
            }
        }
        self.restored = true;
        Ok(())
    }
}
