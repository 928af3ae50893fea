//! Firmware, secure boot and bootloader check.
use std::sync::Arc;

use log::Level;
use serde_json::json;

use crate::actions::{Action, ActionContext};
use crate::adapters::Firmware;
use crate::constants::{SECURE_BOOT_ARTICLE, UEFI_SUPPORTED_ARCH};
use crate::types::{Outcome, Result};

pub const NON_X86_64: &str = "NON_x86_64";
pub const SECURE_BOOT_DETECTED: &str = "SECURE_BOOT_DETECTED";
pub const EFIBOOTMGR_NOT_FOUND: &str = "EFIBOOTMGR_NOT_FOUND";
pub const BOOTLOADER_ERROR: &str = "BOOTLOADER_ERROR";
pub const UEFI_BOOTLOADER_NOT_LOCAL: &str = "UEFI_BOOTLOADER_NOT_LOCAL";

pub struct Efi {
    firmware: Arc<dyn Firmware>,
}

impl Efi {
    pub const ID: &'static str = "efi";

    #[must_use]
    pub fn new(firmware: Arc<dyn Firmware>) -> Self {
        Self { firmware }
    }
}

impl Action for Efi {
    fn id(&self) -> &str {
        Self::ID
    }

    fn run(&self, ctx: &ActionContext<'_>) -> Result<Outcome> {
        if !self.firmware.is_efi() {
            ctx.log(Level::Info, "BIOS detected.");
            return Ok(Outcome::success());
        }
        ctx.log(Level::Info, "UEFI detected.");

        if ctx.system.arch != UEFI_SUPPORTED_ARCH {
            return Ok(Outcome::error(
                NON_X86_64,
                "Only x86_64 systems are supported for UEFI conversions.",
            )
            .with_diagnostics(json!({ "arch": ctx.system.arch })));
        }

        if self.firmware.is_secure_boot() {
            ctx.log(Level::Info, "Secure boot detected.");
            return Ok(Outcome::error(
                SECURE_BOOT_DETECTED,
                format!(
                    "The conversion with secure boot is currently not possible.\n\
                     To disable it, follow the instructions available in this article: {SECURE_BOOT_ARTICLE}"
                ),
            ));
        }

        if !self.firmware.has_efibootmgr() {
            return Ok(Outcome::error(
                EFIBOOTMGR_NOT_FOUND,
                "Install efibootmgr to continue converting the UEFI-based system.",
            ));
        }

        let info = match self.firmware.boot_info() {
            Ok(info) => info,
            Err(e) => return Ok(Outcome::error(BOOTLOADER_ERROR, e.msg)),
        };
        let current = info.current_bootnum.as_str();
        match info.current_entry() {
            Some(entry) if entry.is_referring_to_file() => {
                ctx.log(Level::Info, &format!("Current UEFI boot entry: {current} ({}).", entry.label));
                Ok(Outcome::success())
            }
            _ => Ok(Outcome::warning(
                UEFI_BOOTLOADER_NOT_LOCAL,
                format!(
                    "The current UEFI bootloader '{current}' is not referring to any binary UEFI file \
                     located on local EFI System Partition (ESP)."
                ),
            )
            .with_diagnostics(json!({ "boot_order": info.boot_order }))),
        }
    }
}
