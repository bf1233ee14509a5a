//! Client badge generation and asset store tests.

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use sales_service::models::Client;
use sales_service::services::assets::{
    badge_base64, badge_png, client_badge_name, company_logo_name, AssetStore, LocalAssetStore,
};
use uuid::Uuid;

fn client() -> Client {
    Client {
        client_id: Uuid::new_v4(),
        name: "Aicha Benali".to_string(),
        email: "aicha@example.com".to_string(),
        phone: Some("+212612345678".to_string()),
        client_type: "individual".to_string(),
        active: true,
        deleted: false,
        site_id: None,
        user_id: None,
        enterprise_name: None,
        siret: None,
        vat_number: None,
        created_utc: Utc::now(),
    }
}

#[test]
fn badge_payload_encodes_identity_fields() {
    let c = client();
    assert_eq!(
        c.badge_payload(),
        "Aicha Benali|aicha@example.com|+212612345678"
    );
}

#[test]
fn missing_phone_leaves_an_empty_segment() {
    let mut c = client();
    c.phone = None;
    assert_eq!(c.badge_payload(), "Aicha Benali|aicha@example.com|");
}

#[test]
fn badge_renders_as_png() {
    let png = badge_png(&client().badge_payload()).expect("badge must render");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn badge_base64_round_trips_to_the_same_png() {
    let payload = client().badge_payload();
    let png = badge_png(&payload).unwrap();
    let encoded = badge_base64(&payload).unwrap();
    assert_eq!(general_purpose::STANDARD.decode(encoded).unwrap(), png);
}

#[test]
fn asset_names_are_deterministic() {
    let id = Uuid::nil();
    assert_eq!(
        client_badge_name(id),
        "client_00000000-0000-0000-0000-000000000000.png"
    );
    assert_eq!(
        company_logo_name(id),
        "logo_00000000-0000-0000-0000-000000000000.png"
    );
}

#[tokio::test]
async fn local_store_writes_under_its_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalAssetStore::new(dir.path());

    let name = client_badge_name(Uuid::new_v4());
    store.put(&name, b"png-bytes").await.expect("put must succeed");

    let written = tokio::fs::read(dir.path().join(&name)).await.expect("file exists");
    assert_eq!(written, b"png-bytes");
}

#[tokio::test]
async fn local_store_creates_missing_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("assets").join("badges");
    let store = LocalAssetStore::new(&nested);

    store.put("x.png", b"data").await.expect("put must succeed");
    assert!(nested.join("x.png").exists());
}
