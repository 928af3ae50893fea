//! Parsed firmware boot-entry information.
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One firmware boot entry (`BootXXXX`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootEntry {
    pub boot_number: String,
    pub label: String,
    pub active: bool,
    /// Binary on the local EFI System Partition this entry loads, when it refers to one
    /// that exists.
    pub efi_bin_path: Option<PathBuf>,
}

impl BootEntry {
    #[must_use]
    pub fn is_referring_to_file(&self) -> bool {
        self.efi_bin_path.is_some()
    }
}

/// Boot-entry list plus the entry the firmware booted from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootInfo {
    pub current_bootnum: String,
    pub boot_order: Vec<String>,
    pub entries: BTreeMap<String, BootEntry>,
}

impl BootInfo {
    #[must_use]
    pub fn current_entry(&self) -> Option<&BootEntry> {
        self.entries.get(&self.current_bootnum)
    }
}
