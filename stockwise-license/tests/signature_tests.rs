mod common;

use chrono::{Duration, Utc};
use common::{signed_record, test_engine};
use stockwise_license::{LicenseTier, SignatureEngine};

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn verify_accepts_own_signature() {
    let engine = test_engine();
    for tier in [
        LicenseTier::Basic,
        LicenseTier::Professional,
        LicenseTier::Enterprise,
    ] {
        let record = signed_record(&engine, tier, None);
        assert!(engine.verify(&record, &record.signature));
    }
}

#[test]
fn signature_is_deterministic() {
    let engine = test_engine();
    let record = signed_record(&engine, LicenseTier::Professional, None);
    assert_eq!(
        engine.sign(&record).unwrap(),
        engine.sign(&record).unwrap()
    );
}

// ── Tamper detection ─────────────────────────────────────────────

#[test]
fn mutating_signed_fields_breaks_verification() {
    let engine = test_engine();
    let base = signed_record(&engine, LicenseTier::Basic, None);

    let mut tampered = base.clone();
    tampered.client_email = "thief@evil.example".to_string();
    assert!(!engine.verify(&tampered, &base.signature));

    let mut tampered = base.clone();
    tampered.license_type = LicenseTier::Enterprise;
    assert!(!engine.verify(&tampered, &base.signature));

    let mut tampered = base.clone();
    tampered.features.insert("whiteLabel".to_string(), true);
    assert!(!engine.verify(&tampered, &base.signature));

    let mut tampered = base.clone();
    tampered.max_branches = 1000;
    assert!(!engine.verify(&tampered, &base.signature));

    let mut tampered = base.clone();
    tampered.max_users = 1000;
    assert!(!engine.verify(&tampered, &base.signature));

    let mut tampered = base.clone();
    tampered.expiry_date = Some(Utc::now() + Duration::days(3650));
    assert!(!engine.verify(&tampered, &base.signature));
}

#[test]
fn mutating_unsigned_fields_keeps_verification() {
    let engine = test_engine();
    let base = signed_record(&engine, LicenseTier::Professional, None);

    let mut updated = base.clone();
    updated.last_validated = Some(Utc::now());
    updated.install_count = 3;
    updated.installation_domain = Some("warehouse.acme.example".to_string());
    updated.status = stockwise_license::LicenseStatus::Trial;
    assert!(engine.verify(&updated, &base.signature));
}

// ── Robustness ───────────────────────────────────────────────────

#[test]
fn verify_rejects_garbage_signature() {
    let engine = test_engine();
    let record = signed_record(&engine, LicenseTier::Basic, None);
    assert!(!engine.verify(&record, "not base64 at all!!"));
    assert!(!engine.verify(&record, ""));
    assert!(!engine.verify(&record, "AAAA"));
}

#[test]
fn verify_rejects_signature_from_other_secret() {
    let engine = test_engine();
    let other = SignatureEngine::new(b"some-other-secret");
    let record = signed_record(&engine, LicenseTier::Basic, None);
    assert!(!other.verify(&record, &record.signature));
}

#[test]
fn verify_tolerates_surrounding_whitespace() {
    let engine = test_engine();
    let record = signed_record(&engine, LicenseTier::Basic, None);
    let padded = format!("  {}  ", record.signature);
    assert!(engine.verify(&record, &padded));
}
