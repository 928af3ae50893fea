//! Shared crate-wide constants for distroswap.
//!
//! Centralizes magic values, stable phrases and default paths used across modules.

/// Environment toggle selecting the non-interactive analysis activity.
pub const ANALYSIS_ENV: &str = "DISTROSWAP_EXPERIMENTAL_ANALYSIS";

/// Tool that reads and writes firmware boot entries.
pub const EFIBOOTMGR_PATH: &str = "/usr/sbin/efibootmgr";

/// Only architecture supported for UEFI conversions.
pub const UEFI_SUPPORTED_ARCH: &str = "x86_64";

/// Present when the host booted through UEFI firmware.
pub const EFI_SYSFS_DIR: &str = "/sys/firmware/efi";

/// Mount point of the local EFI System Partition.
pub const EFI_ESP_MOUNT: &str = "/boot/efi";

/// Secure boot state variable (8-GUID suffix is the global EFI namespace).
pub const SECURE_BOOT_EFIVAR: &str =
    "/sys/firmware/efi/efivars/SecureBoot-8be4df61-93ca-11d2-aa0d-00e098032b8c";

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Remediation article for secure boot conversions.
pub const SECURE_BOOT_ARTICLE: &str = "https://access.redhat.com/solutions/6753681";

/// Default directory for file backups captured before mutations.
pub const DEFAULT_BACKUP_DIR: &str = "/var/lib/distroswap/backup";

/// Default single-run lock file, taken by `Converter::run` unless a lock manager is injected.
pub const DEFAULT_LOCK_PATH: &str = "/var/run/distroswap.lock";

/// Lock timeout used by `Policy::default()`.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Poll interval in milliseconds for the file-backed lock manager.
pub const LOCK_POLL_MS: u64 = 25;

/// Default location of the license agreement shown before any check runs.
pub const DEFAULT_EULA_PATH: &str = "/usr/share/distroswap/GPLv3.txt";

/// UUIDv5 namespace tag for deterministic check-set ids.
pub const NS_TAG: &str = "https://distroswap/checks";

/// Final line of every run that unwound before the point of no return.
pub const MSG_NO_CHANGES: &str = "No changes were made to the system.";

/// Critical line logged when pre-PONR checks block the conversion.
pub const MSG_CONVERSION_FAILED: &str = "Conversion failed.";

/// Final critical line when the unwind itself could not restore every change.
pub const MSG_ROLLBACK_INCOMPLETE: &str =
    "Conversion failed. Not every change could be rolled back; manual cleanup of the listed items is required.";

/// Final critical line of every run that failed at or after the point of no return.
pub const MSG_UNDETERMINED: &str = "The system is left in an undetermined state that distroswap cannot fix. \
It is strongly recommended to store the distroswap logs for later investigation, and restore the system from a backup.";

pub const MSG_CONVERSION_SUCCESSFUL: &str = "Conversion successful!";
