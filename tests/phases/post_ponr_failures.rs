use distroswap::types::{ConversionPhase, Disposition};

use crate::common::{converter, registry, FakeFirmware, FakeHost};

const UNDETERMINED: &str = "left in an undetermined state";

#[test]
fn conversion_failure_is_undetermined_without_rollback() {
    for step in [
        "preserve_only_target_kernel",
        "run_transaction",
        "list_foreign_packages_left",
        "set_efi_configuration",
        "patch_package_manager_config",
        "lock_releasever",
    ] {
        let host = FakeHost::new().failing_at(step);
        let (mut conv, facts, audit) = converter(&host, registry(FakeFirmware::bios()));
        let outcome = conv.run();

        assert_eq!(outcome.exit_code(), 1, "{step}");
        assert_eq!(outcome.disposition, Disposition::Undetermined);
        assert_eq!(outcome.final_phase, ConversionPhase::Undetermined);
        assert!(outcome.rollback.is_none());
        assert!(facts.named("rollback.summary").is_empty());
        assert_eq!(host.calls.count_prefix("restore:"), 0);

        let last = audit.last();
        assert!(last.critical);
        assert!(last.msg.contains(UNDETERMINED));
        // Custom facts are refreshed best-effort; later conversion steps never run.
        assert_eq!(host.calls.count("update_custom_facts"), 1);
        assert_eq!(host.calls.count("modified_files_diff"), 0);
    }
}

#[test]
fn transaction_failure_stops_the_remaining_steps() {
    let host = FakeHost::new().failing_at("run_transaction");
    let (mut conv, facts, _) = converter(&host, registry(FakeFirmware::bios()));
    conv.run();
    assert_eq!(host.calls.count("list_foreign_packages_left"), 0);
    assert_eq!(host.calls.count("lock_releasever"), 0);
    let failed = facts.named("phase").into_iter().find(|(d, _)| d == "failure").unwrap();
    assert_eq!(failed.1["error_id"], "E_CONVERSION");
    assert_eq!(failed.1["step"], "run_transaction");
}

#[test]
fn finalization_failure_is_undetermined_without_rollback() {
    let host = FakeHost::new().failing_at("update_bootloader");
    let (mut conv, facts, audit) = converter(&host, registry(FakeFirmware::bios()));
    let outcome = conv.run();
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.disposition, Disposition::Undetermined);
    assert!(facts.named("rollback.summary").is_empty());
    assert_eq!(host.calls.count("update_custom_facts"), 1);
    assert_eq!(host.calls.count("restart_system"), 0);
    assert!(audit.last().msg.contains(UNDETERMINED));
}

#[test]
fn failing_custom_facts_update_is_not_retried() {
    let host = FakeHost::new().failing_at("update_custom_facts");
    let (mut conv, _, audit) = converter(&host, registry(FakeFirmware::bios()));
    assert_eq!(conv.run().exit_code(), 1);
    assert_eq!(host.calls.count("update_custom_facts"), 1);
    assert!(audit.last().critical);
}

#[test]
fn panicking_conversion_step_is_undetermined_without_rollback() {
    let host = FakeHost::new().panicking_at("run_transaction");
    let (mut conv, facts, audit) = converter(&host, registry(FakeFirmware::bios()));
    let outcome = conv.run();

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.disposition, Disposition::Undetermined);
    assert_eq!(outcome.final_phase, ConversionPhase::Undetermined);
    assert!(outcome.errors[0].starts_with("conversion: unhandled failure: run_transaction"));
    assert!(facts.named("rollback.summary").is_empty());
    assert_eq!(host.calls.count_prefix("restore:"), 0);
    assert_eq!(host.calls.count("list_foreign_packages_left"), 0);
    assert_eq!(host.calls.count("update_custom_facts"), 1);

    let last = audit.last();
    assert!(last.critical);
    assert!(last.msg.contains(UNDETERMINED));
}

#[test]
fn panicking_finalization_step_is_undetermined() {
    for step in ["update_bootloader", "update_custom_facts", "restart_system"] {
        let host = FakeHost::new().panicking_at(step);
        let (mut conv, facts, audit) = converter(&host, registry(FakeFirmware::bios()));
        let outcome = conv.run();

        assert_eq!(outcome.exit_code(), 1, "{step}");
        assert_eq!(outcome.disposition, Disposition::Undetermined);
        assert!(outcome.errors[0].starts_with("finalization: unhandled failure"));
        assert!(facts.named("rollback.summary").is_empty());
        // Tried exactly once, whether finalization reached it or not.
        assert_eq!(host.calls.count("update_custom_facts"), 1, "{step}");
        assert!(audit.last().critical);
        assert!(audit.last().msg.contains(UNDETERMINED));
    }
}
