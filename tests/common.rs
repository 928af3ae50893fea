//! Shared fakes for the distroswap integration tests.
//!
//! `FakeHost` implements every phase collaborator and records each call in a shared
//! log, so a test can assert what ran and in which order.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::Level;
use serde_json::Value;

use distroswap::actions::system_checks::default_registry;
use distroswap::actions::{Action, ActionRegistry};
use distroswap::adapters::mount::{MountError, MountFlags};
use distroswap::adapters::{
    Bootstrap, Confirmation, ConversionSteps, Finalization, Firmware, MountInspector, Preparation,
};
use distroswap::backup::{BackupController, RestorableChange};
use distroswap::logging::{AuditSink, FactsEmitter};
use distroswap::policy::{Activity, Policy, ToolOptions};
use distroswap::rollback::{RollbackOrchestrator, RollbackStep};
use distroswap::types::errors::{Error, ErrorKind, Result};
use distroswap::types::{BootEntry, BootInfo, SystemInfo, Version};
use distroswap::Converter;

/// Captures facts in memory.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl TestEmitter {
    pub fn named(&self, event: &str) -> Vec<(String, Value)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e, _, _)| e == event)
            .map(|(_, _, d, f)| (d.clone(), f.clone()))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub level: Level,
    pub critical: bool,
    pub msg: String,
}

/// Records audit lines, keeping critical ones distinguishable.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<Line>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push(Line {
            level,
            critical: false,
            msg: msg.to_string(),
        });
    }

    fn critical(&self, msg: &str) {
        self.lines.lock().unwrap().push(Line {
            level: Level::Error,
            critical: true,
            msg: msg.to_string(),
        });
    }
}

impl TestAudit {
    /// Last line at info level or above; debug chatter is not part of the final-line contract.
    pub fn last(&self) -> Line {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|l| l.level <= Level::Info)
            .cloned()
            .unwrap()
    }

    pub fn has(&self, msg: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.msg.contains(msg))
    }

    pub fn criticals(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.critical)
            .map(|l| l.msg.clone())
            .collect()
    }
}

/// Ordered log of collaborator calls, shared between fakes.
#[derive(Clone, Default, Debug)]
pub struct Calls(pub Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn push(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

/// Restorable that logs `restore:<name>`.
pub struct FakeChange {
    pub name: String,
    pub calls: Calls,
    pub fail: bool,
}

impl FakeChange {
    pub fn boxed(name: &str, calls: &Calls, fail: bool) -> Box<dyn RestorableChange> {
        Box::new(FakeChange {
            name: name.to_string(),
            calls: calls.clone(),
            fail,
        })
    }
}

impl RestorableChange for FakeChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn restore(&mut self) -> Result<()> {
        self.calls.push(&format!("restore:{}", self.name));
        if self.fail {
            return Err(Error::new(ErrorKind::Command, format!("{} could not be restored", self.name)));
        }
        Ok(())
    }
}

/// Every phase collaborator in one fake. `fail_at` names the method that returns an
/// error, `panic_at` the one that panics. `root` is a scratch directory for run state.
#[derive(Clone)]
pub struct FakeHost {
    pub calls: Calls,
    pub fail_at: Option<&'static str>,
    pub panic_at: Option<&'static str>,
    pub root: Arc<tempfile::TempDir>,
    pub accept: bool,
    pub options: ToolOptions,
    pub system: SystemInfo,
    pub foreign_left: Vec<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            calls: Calls::default(),
            fail_at: None,
            panic_at: None,
            root: Arc::new(tempfile::tempdir().unwrap()),
            accept: true,
            options: ToolOptions::default(),
            system: centos7(),
            foreign_left: Vec::new(),
        }
    }

    pub fn failing_at(mut self, step: &'static str) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn panicking_at(mut self, step: &'static str) -> Self {
        self.panic_at = Some(step);
        self
    }

    /// Run-state paths (lock, backups, logs) under `root`.
    pub fn policy(&self) -> Policy {
        Policy::rooted_at(self.root.path())
    }

    pub fn declining(mut self) -> Self {
        self.accept = false;
        self
    }

    pub fn analysis(mut self) -> Self {
        self.options.activity = Activity::Analysis;
        self
    }

    fn step(&self, name: &'static str) -> Result<()> {
        self.calls.push(name);
        if self.panic_at == Some(name) {
            panic!("{name} hit an unexpected state");
        }
        if self.fail_at == Some(name) {
            return Err(Error::new(ErrorKind::Command, format!("{name} exploded")));
        }
        Ok(())
    }
}

impl Bootstrap for FakeHost {
    fn require_root(&self) -> Result<()> {
        self.step("require_root")
    }
    fn initialize_logger(&self) -> Result<()> {
        self.step("initialize_logger")
    }
    fn parse_cli(&self) -> Result<ToolOptions> {
        self.step("parse_cli")?;
        Ok(self.options.clone())
    }
    fn show_eula(&self) -> Result<()> {
        self.step("show_eula")
    }
}

impl Preparation for FakeHost {
    fn resolve_system_info(&self) -> Result<SystemInfo> {
        self.step("resolve_system_info")?;
        Ok(self.system.clone())
    }
    fn clean_metadata(&self) -> Result<()> {
        self.step("clean_metadata")
    }
    fn clear_versionlock(&self, backups: &mut BackupController) -> Result<()> {
        self.step("clear_versionlock")?;
        backups.record(FakeChange::boxed("versionlock.list", &self.calls, false));
        Ok(())
    }
}

impl Confirmation for FakeHost {
    fn ask_to_continue(&self, _options: &ToolOptions) -> Result<bool> {
        self.step("ask_to_continue")?;
        Ok(self.accept)
    }
}

impl ConversionSteps for FakeHost {
    fn preserve_only_target_kernel(&self) -> Result<()> {
        self.step("preserve_only_target_kernel")
    }
    fn run_transaction(&self) -> Result<()> {
        self.step("run_transaction")
    }
    fn list_foreign_packages_left(&self) -> Result<Vec<String>> {
        self.step("list_foreign_packages_left")?;
        Ok(self.foreign_left.clone())
    }
    fn set_efi_configuration(&self, _system: &SystemInfo) -> Result<()> {
        self.step("set_efi_configuration")
    }
    fn patch_package_manager_config(&self) -> Result<()> {
        self.step("patch_package_manager_config")
    }
    fn lock_releasever(&self, _system: &SystemInfo) -> Result<()> {
        self.step("lock_releasever")
    }
}

impl Finalization for FakeHost {
    fn modified_files_diff(&self) -> Result<()> {
        self.step("modified_files_diff")
    }
    fn check_kernel_boot_files(&self) -> Result<()> {
        self.step("check_kernel_boot_files")
    }
    fn update_bootloader(&self, _system: &SystemInfo) -> Result<()> {
        self.step("update_bootloader")
    }
    fn remove_tmp_dir(&self) -> Result<()> {
        self.step("remove_tmp_dir")
    }
    fn update_custom_facts(&self) -> Result<()> {
        self.step("update_custom_facts")
    }
    fn restart_system(&self, _options: &ToolOptions) -> Result<()> {
        self.step("restart_system")
    }
}

pub fn centos7() -> SystemInfo {
    SystemInfo {
        id: "centos".into(),
        name: "CentOS Linux".into(),
        version: Version { major: 7, minor: 9 },
        arch: "x86_64".into(),
        efi: false,
    }
}

/// Scriptable firmware.
#[derive(Clone)]
pub struct FakeFirmware {
    pub efi: bool,
    pub secure_boot: bool,
    pub efibootmgr: bool,
    pub boot_info: std::result::Result<BootInfo, String>,
}

impl FakeFirmware {
    pub fn bios() -> Self {
        Self {
            efi: false,
            secure_boot: false,
            efibootmgr: false,
            boot_info: Err("not a UEFI system".into()),
        }
    }

    /// UEFI host whose current entry `0001` points at a shim on the ESP.
    pub fn uefi() -> Self {
        let entry = BootEntry {
            boot_number: "0001".into(),
            label: "CentOS Linux".into(),
            active: true,
            efi_bin_path: Some("/boot/efi/EFI/centos/shimx64.efi".into()),
        };
        Self {
            efi: true,
            secure_boot: false,
            efibootmgr: true,
            boot_info: Ok(BootInfo {
                current_bootnum: "0001".into(),
                boot_order: vec!["0001".into()],
                entries: [("0001".to_string(), entry)].into_iter().collect(),
            }),
        }
    }
}

impl Firmware for FakeFirmware {
    fn is_efi(&self) -> bool {
        self.efi
    }
    fn is_secure_boot(&self) -> bool {
        self.secure_boot
    }
    fn has_efibootmgr(&self) -> bool {
        self.efibootmgr
    }
    fn boot_info(&self) -> Result<BootInfo> {
        self.boot_info
            .clone()
            .map_err(|msg| Error::new(ErrorKind::Bootloader, msg))
    }
}

/// Nothing mounted anywhere.
pub struct NoMounts;

impl MountInspector for NoMounts {
    fn mounted_at(&self, _mount_point: &Path) -> std::result::Result<Option<MountFlags>, MountError> {
        Ok(None)
    }
}

pub fn registry(firmware: FakeFirmware) -> ActionRegistry {
    default_registry(Arc::new(firmware), Arc::new(NoMounts)).unwrap()
}

pub fn registry_of(actions: Vec<Box<dyn Action>>) -> ActionRegistry {
    ActionRegistry::new(actions).unwrap()
}

/// Orchestrator with one recording collaborator per named step.
pub fn recording_rollback(calls: &Calls) -> RollbackOrchestrator {
    let mut orch = RollbackOrchestrator::new();
    for step in RollbackStep::ORDER {
        if step != RollbackStep::BackupStack {
            orch.register(step, FakeChange::boxed(step.as_str(), calls, false));
        }
    }
    orch
}

/// Converter wired entirely with fakes.
pub fn converter(host: &FakeHost, registry: ActionRegistry) -> (Converter<TestEmitter, TestAudit>, TestEmitter, TestAudit) {
    converter_with_policy(host, registry, host.policy())
}

pub fn converter_with_policy(
    host: &FakeHost,
    registry: ActionRegistry,
    policy: Policy,
) -> (Converter<TestEmitter, TestAudit>, TestEmitter, TestAudit) {
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    let conv = Converter::new(facts.clone(), audit.clone(), policy, registry)
        .with_bootstrap(Box::new(host.clone()))
        .with_preparation(Box::new(host.clone()))
        .with_confirmation(Box::new(host.clone()))
        .with_conversion(Box::new(host.clone()))
        .with_finalization(Box::new(host.clone()))
        .with_rollback(recording_rollback(&host.calls));
    (conv, facts, audit)
}
