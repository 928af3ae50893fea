//! Resolved facts about the host being converted.
use serde::Serialize;

/// `major.minor` distribution version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Context object describing the host. Created once, resolved during pre-PONR checks
/// and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub id: String,
    pub name: String,
    pub version: Version,
    pub arch: String,
    pub efi: bool,
}

impl SystemInfo {
    /// Build from the contents of an `os-release` file and a machine architecture.
    #[must_use]
    pub fn from_os_release(content: &str, arch: &str) -> Self {
        let mut info = SystemInfo {
            arch: arch.to_string(),
            ..SystemInfo::default()
        };
        for line in content.lines() {
            let Some((key, raw)) = line.split_once('=') else {
                continue;
            };
            let value = raw.trim().trim_matches('"').to_string();
            match key.trim() {
                "ID" => info.id = value,
                "NAME" => info.name = value,
                "VERSION_ID" => {
                    let mut parts = value.split('.');
                    info.version.major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
                    info.version.minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
                }
                _ => {}
            }
        }
        info
    }

    /// Probe the running host: `/etc/os-release`, `uname -m` and `/sys/firmware/efi`.
    ///
    /// # Errors
    /// Returns an error when `/etc/os-release` cannot be read.
    pub fn detect() -> crate::types::Result<Self> {
        let content = std::fs::read_to_string(crate::constants::OS_RELEASE_PATH)?;
        let uname = rustix::system::uname();
        let arch = uname.machine().to_string_lossy().into_owned();
        let mut info = Self::from_os_release(&content, &arch);
        info.efi = std::path::Path::new(crate::constants::EFI_SYSFS_DIR).is_dir();
        Ok(info)
    }

    /// One-line description used in the run log.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} {} ({}, {})",
            self.name,
            self.version,
            self.arch,
            if self.efi { "UEFI" } else { "BIOS" }
        )
    }
}
