//! Client validation tests: type-conditional tax identifiers and the
//! phone format.

use sales_service::models::{
    check_type_fields, merge_type_identifiers, ClientType, CreateClient,
};
use validator::Validate;

fn base_client() -> CreateClient {
    CreateClient {
        name: "Aicha Benali".to_string(),
        email: "aicha@example.com".to_string(),
        phone: Some("+212612345678".to_string()),
        client_type: ClientType::Individual,
        site_id: None,
        user_id: None,
        enterprise_name: None,
        siret: None,
        vat_number: None,
    }
}

// ----------------------------------------------------------------------------
// Type-conditional identifier checks
// ----------------------------------------------------------------------------

#[test]
fn enterprise_requires_both_identifiers() {
    let err = check_type_fields(ClientType::Enterprise, None, None).unwrap_err();
    assert!(err.field_errors().contains_key("siret"));
    assert!(err.field_errors().contains_key("vat_number"));
}

#[test]
fn enterprise_with_one_identifier_still_fails() {
    let err = check_type_fields(ClientType::Enterprise, Some("12345678901234"), None).unwrap_err();
    assert!(!err.field_errors().contains_key("siret"));
    assert!(err.field_errors().contains_key("vat_number"));
}

#[test]
fn empty_string_counts_as_missing() {
    let err = check_type_fields(ClientType::Enterprise, Some(""), Some("   ")).unwrap_err();
    assert!(err.field_errors().contains_key("siret"));
    assert!(err.field_errors().contains_key("vat_number"));
}

#[test]
fn enterprise_with_both_identifiers_passes() {
    check_type_fields(
        ClientType::Enterprise,
        Some("12345678901234"),
        Some("FR12345678901"),
    )
    .expect("complete enterprise identifiers must pass");
}

#[test]
fn individual_must_not_carry_identifiers() {
    let err =
        check_type_fields(ClientType::Individual, Some("12345678901234"), None).unwrap_err();
    assert!(err.field_errors().contains_key("siret"));

    let err =
        check_type_fields(ClientType::Individual, None, Some("FR12345678901")).unwrap_err();
    assert!(err.field_errors().contains_key("vat_number"));
}

#[test]
fn individual_without_identifiers_passes() {
    check_type_fields(ClientType::Individual, None, None)
        .expect("bare individual must pass");
    // Blank identifiers are treated as absent.
    check_type_fields(ClientType::Individual, Some(""), Some(" "))
        .expect("blank identifiers count as absent");
}

// ----------------------------------------------------------------------------
// Update merge
// ----------------------------------------------------------------------------

#[test]
fn converting_enterprise_to_individual_drops_stored_identifiers() {
    // The update sends only the new type; the stored identifiers must
    // not be merged back in.
    let (siret, vat) = merge_type_identifiers(
        ClientType::Individual,
        None,
        None,
        Some("12345678901234"),
        Some("FR12345678901"),
    );
    assert_eq!(siret, None);
    assert_eq!(vat, None);
    check_type_fields(ClientType::Individual, siret.as_deref(), vat.as_deref())
        .expect("conversion to individual must validate");
}

#[test]
fn individual_update_with_explicit_identifier_still_fails() {
    let (siret, vat) = merge_type_identifiers(
        ClientType::Individual,
        Some("12345678901234"),
        None,
        None,
        Some("FR12345678901"),
    );
    assert_eq!(siret.as_deref(), Some("12345678901234"));
    assert_eq!(vat, None);
    assert!(
        check_type_fields(ClientType::Individual, siret.as_deref(), vat.as_deref()).is_err()
    );
}

#[test]
fn enterprise_update_keeps_stored_identifiers() {
    let (siret, vat) = merge_type_identifiers(
        ClientType::Enterprise,
        None,
        Some("FR99999999999"),
        Some("12345678901234"),
        Some("FR11111111111"),
    );
    assert_eq!(siret.as_deref(), Some("12345678901234"));
    assert_eq!(vat.as_deref(), Some("FR99999999999"));
    check_type_fields(ClientType::Enterprise, siret.as_deref(), vat.as_deref())
        .expect("merged enterprise identifiers must validate");
}

// ----------------------------------------------------------------------------
// Field-level validation
// ----------------------------------------------------------------------------

#[test]
fn valid_client_passes_field_validation() {
    base_client().validate().expect("base client must validate");
}

#[test]
fn phone_must_be_ten_to_fifteen_digits() {
    let mut client = base_client();

    client.phone = Some("12345".to_string());
    assert!(client.validate().is_err(), "too short");

    client.phone = Some("+1234567890123456".to_string());
    assert!(client.validate().is_err(), "too long");

    client.phone = Some("06-12-34-56-78".to_string());
    assert!(client.validate().is_err(), "separators are not digits");

    client.phone = Some("0612345678".to_string());
    assert!(client.validate().is_ok(), "ten digits without prefix");
}

#[test]
fn email_format_is_enforced() {
    let mut client = base_client();
    client.email = "not-an-email".to_string();
    let err = client.validate().unwrap_err();
    assert!(err.field_errors().contains_key("email"));
}

#[test]
fn name_must_not_be_empty() {
    let mut client = base_client();
    client.name = String::new();
    assert!(client.validate().is_err());
}
