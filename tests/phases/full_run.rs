use distroswap::types::{ConversionPhase, Disposition};

use crate::common::{converter, registry, FakeFirmware, FakeHost};

const COLLABORATOR_CALLS: [&str; 20] = [
    "require_root",
    "initialize_logger",
    "parse_cli",
    "show_eula",
    "resolve_system_info",
    "clean_metadata",
    "clear_versionlock",
    "ask_to_continue",
    "preserve_only_target_kernel",
    "run_transaction",
    "list_foreign_packages_left",
    "set_efi_configuration",
    "patch_package_manager_config",
    "lock_releasever",
    "modified_files_diff",
    "check_kernel_boot_files",
    "update_bootloader",
    "remove_tmp_dir",
    "update_custom_facts",
    "restart_system",
];

#[test]
fn successful_run_calls_every_collaborator_once() {
    let host = FakeHost::new();
    let (mut conv, facts, audit) = converter(&host, registry(FakeFirmware::uefi()));
    let outcome = conv.run();

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.disposition, Disposition::Completed);
    assert_eq!(outcome.final_phase, ConversionPhase::Complete);
    assert!(outcome.rollback.is_none());
    assert!(outcome.errors.is_empty());

    assert_eq!(host.calls.all(), COLLABORATOR_CALLS.to_vec());
    assert_eq!(host.calls.count_prefix("restore:"), 0);
    assert!(facts.named("rollback.summary").is_empty());

    let last = audit.last();
    assert_eq!(last.msg, "Conversion successful!");
    assert!(!last.critical);
}

#[test]
fn phase_facts_follow_the_state_machine() {
    let host = FakeHost::new();
    let (mut conv, facts, _) = converter(&host, registry(FakeFirmware::bios()));
    conv.run();

    let phases: Vec<String> = facts
        .named("phase")
        .iter()
        .map(|(_, f)| f["phase"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        phases,
        vec![
            "pre_ponr_checks",
            "awaiting_confirmation",
            "ponr_crossed",
            "post_ponr_conversion",
            "finalizing",
            "complete"
        ]
    );
    for (_, fields) in facts.events.lock().unwrap().iter().map(|(_, e, _, f)| (e, f)) {
        assert_eq!(fields["schema_version"], 1);
        assert_eq!(fields["analysis"], false);
    }
    let actions = facts.named("action");
    assert_eq!(actions.len(), 2);
    assert!(actions.iter().all(|(d, _)| d == "success"));
}

#[test]
fn foreign_packages_left_are_only_a_warning() {
    let mut host = FakeHost::new();
    host.foreign_left = vec!["centos-logos".into()];
    let (mut conv, _, audit) = converter(&host, registry(FakeFirmware::bios()));
    let outcome = conv.run();
    assert_eq!(outcome.exit_code(), 0);
    assert!(audit.has("centos-logos"));
}

#[test]
fn warnings_do_not_block_under_the_default_threshold() {
    let host = FakeHost::new();
    let mut fw = FakeFirmware::uefi();
    if let Ok(info) = fw.boot_info.as_mut() {
        info.entries.clear();
    }
    let (mut conv, facts, _) = converter(&host, registry(fw));
    let outcome = conv.run();
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.results[0].error_id.as_deref(), Some("UEFI_BOOTLOADER_NOT_LOCAL"));
    let efi_fact = facts.named("action").into_iter().find(|(_, f)| f["action_id"] == "efi").unwrap();
    assert_eq!(efi_fact.0, "warn");
}
