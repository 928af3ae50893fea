//! Firmware boot mode, secure boot state and boot-entry enumeration.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::{EFIBOOTMGR_PATH, EFI_ESP_MOUNT, EFI_SYSFS_DIR, SECURE_BOOT_EFIVAR};
use crate::types::{BootEntry, BootInfo, Error, ErrorKind, Result};

pub trait Firmware: Send + Sync {
    fn is_efi(&self) -> bool;
    fn is_secure_boot(&self) -> bool;
    /// Whether the boot-entry inspection tool is installed.
    fn has_efibootmgr(&self) -> bool;
    /// Read the current boot entries.
    /// # Errors
    /// Returns a `Bootloader` error when the entries cannot be read or parsed.
    fn boot_info(&self) -> Result<BootInfo>;
}

/// Production firmware inspector backed by sysfs and `efibootmgr`.
#[derive(Debug, Clone)]
pub struct SysFirmware {
    efibootmgr: PathBuf,
    esp: PathBuf,
}

impl Default for SysFirmware {
    fn default() -> Self {
        Self {
            efibootmgr: PathBuf::from(EFIBOOTMGR_PATH),
            esp: PathBuf::from(EFI_ESP_MOUNT),
        }
    }
}

impl Firmware for SysFirmware {
    fn is_efi(&self) -> bool {
        Path::new(EFI_SYSFS_DIR).is_dir()
    }

    fn is_secure_boot(&self) -> bool {
        // efivarfs payload: 4 attribute bytes followed by the value byte.
        match std::fs::read(SECURE_BOOT_EFIVAR) {
            Ok(bytes) => bytes.get(4) == Some(&1),
            Err(_) => false,
        }
    }

    fn has_efibootmgr(&self) -> bool {
        self.efibootmgr.exists()
    }

    fn boot_info(&self) -> Result<BootInfo> {
        let output = Command::new(&self.efibootmgr)
            .arg("-v")
            .output()
            .map_err(|e| bootloader_error(format!("Unable to run {}: {e}", self.efibootmgr.display())))?;
        if !output.status.success() {
            return Err(bootloader_error(
                "Unable to get information about UEFI boot entries.",
            ));
        }
        parse_efibootmgr(&String::from_utf8_lossy(&output.stdout), &self.esp)
    }
}

fn bootloader_error(msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::Bootloader, msg)
}

/// Parse `efibootmgr -v` output. Entry binaries are resolved against `esp` and only
/// kept when the file exists there.
///
/// # Errors
/// Returns a `Bootloader` error when the current boot entry cannot be determined.
pub fn parse_efibootmgr(output: &str, esp: &Path) -> Result<BootInfo> {
    let mut current = None;
    let mut boot_order = Vec::new();
    let mut entries = BTreeMap::new();

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("BootCurrent:") {
            current = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("BootOrder:") {
            boot_order = rest
                .trim()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        } else if let Some(entry) = parse_entry_line(line, esp) {
            entries.insert(entry.boot_number.clone(), entry);
        }
    }

    let current_bootnum = current
        .filter(|c| !c.is_empty())
        .ok_or_else(|| bootloader_error("Unable to detect the current UEFI boot entry."))?;
    Ok(BootInfo {
        current_bootnum,
        boot_order,
        entries,
    })
}

fn parse_entry_line(line: &str, esp: &Path) -> Option<BootEntry> {
    let rest = line.strip_prefix("Boot")?;
    let number = rest.get(..4)?;
    if !number.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let tail = &rest[4..];
    let active = tail.starts_with('*');
    let tail = tail.trim_start_matches('*').trim_start();
    let (label, device) = tail.split_once('\t').unwrap_or((tail, ""));
    let efi_bin_path = file_path_of(device).map(|p| esp.join(p)).filter(|p| p.exists());
    Some(BootEntry {
        boot_number: number.to_string(),
        label: label.trim().to_string(),
        active,
        efi_bin_path,
    })
}

/// Extract `File(\EFI\x\y.efi)` as a relative `EFI/x/y.efi` path.
fn file_path_of(device: &str) -> Option<PathBuf> {
    let start = device.find("File(")? + "File(".len();
    let end = device[start..].find(')')? + start;
    let raw = device[start..end].replace('\\', "/");
    let rel = raw.trim_start_matches('/');
    if rel.is_empty() {
        return None;
    }
    Some(PathBuf::from(rel))
}
