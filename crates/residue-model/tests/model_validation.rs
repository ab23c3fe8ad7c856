use chrono::{TimeZone, Utc};
use residue_model::{AssetItem, AssetKind, AssetManifest, AssetPriority, NetworkType};

fn ts() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 9, 30, 0)
        .single()
        .expect("timestamp")
}

fn asset(id: &str) -> AssetItem {
    AssetItem::new(
        id.to_string(),
        1,
        "deadbeef".to_string(),
        1024,
        format!("https://cdn.example/{id}"),
    )
}

#[test]
fn manifest_validate_rejects_version_zero() {
    let manifest = AssetManifest::new(0, ts());
    assert!(manifest.validate_strict().is_err());
}

#[test]
fn manifest_validate_rejects_duplicate_asset_ids() {
    let mut manifest = AssetManifest::new(3, ts());
    manifest.assets.push(asset("bg_001"));
    manifest.assets.push(asset("bg_001"));
    let err = manifest.validate_strict().expect_err("duplicate ids");
    assert!(err.0.contains("duplicate asset_id"));
}

#[test]
fn manifest_validate_rejects_asset_version_zero() {
    let mut manifest = AssetManifest::new(3, ts());
    let mut bad = asset("bg_001");
    bad.version = 0;
    manifest.assets.push(bad);
    let err = manifest.validate_strict().expect_err("zero asset version");
    assert!(err.0.contains("version must be >= 1"));
}

#[test]
fn manifest_validate_rejects_empty_deleted_id() {
    let mut manifest = AssetManifest::new(3, ts());
    manifest.deleted_asset_ids.push("  ".to_string());
    assert!(manifest.validate_strict().is_err());
}

#[test]
fn manifest_validate_accepts_well_formed_document() {
    let mut manifest = AssetManifest::new(7, ts());
    manifest.required_bytes_wifi = 4096;
    manifest.required_bytes_cellular = 1024;
    manifest.assets.push(asset("bg_001"));
    manifest.assets.push(asset("sfx_door"));
    manifest.deleted_asset_ids.push("bg_000".to_string());
    assert!(manifest.validate_strict().is_ok());
}

#[test]
fn manifest_wire_defaults_fill_kind_priority_and_tags() {
    let raw = r#"{
        "manifest_version": 2,
        "generated_at": "2025-11-03T09:30:00Z",
        "required_bytes_wifi": 100,
        "required_bytes_cellular": 50,
        "assets": [{
            "asset_id": "bg_001",
            "version": 1,
            "hash": "deadbeef",
            "size_bytes": 100,
            "cdn_url": "https://cdn.example/bg_001"
        }]
    }"#;
    let manifest: AssetManifest = serde_json::from_str(raw).expect("manifest json");
    assert_eq!(manifest.assets[0].kind, AssetKind::Image);
    assert_eq!(manifest.assets[0].priority, AssetPriority::Normal);
    assert!(manifest.assets[0].tags.is_empty());
    assert!(manifest.deleted_asset_ids.is_empty());
    assert!(manifest.validate_strict().is_ok());
}

#[test]
fn manifest_rejects_unknown_fields() {
    let raw = r#"{
        "manifest_version": 2,
        "generated_at": "2025-11-03T09:30:00Z",
        "required_bytes_wifi": 0,
        "required_bytes_cellular": 0,
        "assets": [],
        "surprise": true
    }"#;
    assert!(serde_json::from_str::<AssetManifest>(raw).is_err());
}

#[test]
fn manifest_rejects_negative_sizes_at_parse_time() {
    let raw = r#"{
        "manifest_version": 2,
        "generated_at": "2025-11-03T09:30:00Z",
        "required_bytes_wifi": -1,
        "required_bytes_cellular": 0,
        "assets": []
    }"#;
    assert!(serde_json::from_str::<AssetManifest>(raw).is_err());
}

#[test]
fn asset_type_uses_wire_name_type() {
    let item = asset("bg_001");
    let value = serde_json::to_value(&item).expect("asset json");
    assert_eq!(value["type"], "image");
    assert!(value.get("kind").is_none());
}

#[test]
fn network_type_defaults_to_unknown_on_wire() {
    assert_eq!(NetworkType::default(), NetworkType::Unknown);
    assert_eq!(
        serde_json::to_value(NetworkType::Cellular).expect("network json"),
        serde_json::Value::String("cellular".to_string())
    );
}
