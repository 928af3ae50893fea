use distroswap::actions::{report, run_actions, ActionContext};
use distroswap::types::Severity;

use crate::common::{centos7, registry, FakeFirmware, TestAudit};

#[test]
fn default_checks_export_to_yaml() {
    let mut firmware = FakeFirmware::uefi();
    firmware.secure_boot = true;
    let reg = registry(firmware);
    let system = centos7();
    let audit = TestAudit::default();
    let results = run_actions(&reg, &ActionContext::new(&system, &audit), true);

    let ids: Vec<&str> = results.iter().map(|r| r.action_id.as_str()).collect();
    assert_eq!(ids, vec!["efi", "readonly_mounts"]);
    assert_eq!(results[0].severity, Severity::Error);

    let yaml = report::to_yaml(&results);
    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    let seq = parsed.as_sequence().unwrap();
    assert_eq!(seq[0]["error_id"].as_str(), Some("SECURE_BOOT_DETECTED"));
    assert_eq!(seq[1]["severity"].as_str(), Some("SUCCESS"));

    assert_eq!(report::summary(&results, &audit), 1);
}
