//! Invoice footer composition tests.

use chrono::Utc;
use rust_decimal::Decimal;
use sales_service::models::{Company, Region, Site};
use uuid::Uuid;

fn company() -> Company {
    Company {
        company_id: Uuid::new_v4(),
        name: "Atlas Distribution".to_string(),
        phone: Some("+212522334455".to_string()),
        address_line1: None,
        address_line2: None,
        city: Some("Casablanca".to_string()),
        patente: None,
        trade_registry: Some("RC-998877".to_string()),
        cnss_number: Some("CNSS-4455".to_string()),
        fiscal_id: Some("IF-112233".to_string()),
        ice_number: Some("ICE-000111222".to_string()),
        bank_rib: None,
        legal_form: Some("sarl".to_string()),
        registered_capital: Some("100000".parse::<Decimal>().unwrap()),
        email: None,
        business_sector: Some("Wholesale".to_string()),
        active: true,
        deleted: false,
        created_utc: Utc::now(),
        updated_utc: Utc::now(),
    }
}

fn site(company_id: Uuid) -> Site {
    Site {
        site_id: Uuid::new_v4(),
        company_id,
        name: "Casablanca Depot".to_string(),
        invoice_name: "Atlas Casablanca".to_string(),
        phone: Some("+212600112233".to_string()),
        address_line1: None,
        address_line2: None,
        city: None,
        patente: None,
        reference_code: "CAS-01".to_string(),
        bank_rib: Some("007 810 0001122334455667 88".to_string()),
        region: Region::Ma06.as_str().to_string(),
        active: true,
        deleted: false,
        created_utc: Utc::now(),
        updated_utc: Utc::now(),
    }
}

#[test]
fn header_prefers_company_phone() {
    let company = company();
    let site = site(company.company_id);
    let footer = site.invoice_footer(&company);
    assert_eq!(
        footer.header,
        "Atlas Distribution SARL - Tel: +212522334455 - Business sector: Wholesale"
    );
}

#[test]
fn header_falls_back_to_site_phone() {
    let mut company = company();
    company.phone = None;
    company.business_sector = None;
    let site = site(company.company_id);
    let footer = site.invoice_footer(&company);
    assert_eq!(footer.header, "Atlas Distribution SARL - Tel: +212600112233");
}

#[test]
fn header_without_legal_form_uses_plain_name() {
    let mut company = company();
    company.legal_form = None;
    company.business_sector = None;
    let site = site(company.company_id);
    let footer = site.invoice_footer(&company);
    assert_eq!(footer.header, "Atlas Distribution - Tel: +212522334455");
}

#[test]
fn additional_info_joins_present_fields_in_order() {
    let company = company();
    let site = site(company.company_id);
    let footer = site.invoice_footer(&company);
    assert_eq!(
        footer.additional_info,
        "City: Casablanca - ICE: ICE-000111222 - RC: RC-998877 - Fiscal ID: IF-112233 - CNSS: CNSS-4455"
    );
}

#[test]
fn absent_fields_leave_no_separator_artifacts() {
    let mut company = company();
    company.city = None;
    company.ice_number = None;
    company.fiscal_id = None;
    let site = site(company.company_id);
    let footer = site.invoice_footer(&company);
    assert_eq!(footer.additional_info, "RC: RC-998877 - CNSS: CNSS-4455");
    assert!(!footer.additional_info.starts_with(" - "));
    assert!(!footer.additional_info.ends_with(" - "));
}

#[test]
fn payment_info_carries_rib_and_capital() {
    let company = company();
    let site = site(company.company_id);
    let footer = site.invoice_footer(&company);
    assert_eq!(
        footer.payment_info,
        "RIB: 007 810 0001122334455667 88 - Registered capital: 100000 MAD"
    );
}

#[test]
fn payment_info_empty_when_nothing_is_set() {
    let mut company = company();
    company.registered_capital = None;
    let mut site = site(company.company_id);
    site.bank_rib = None;
    let footer = site.invoice_footer(&company);
    assert!(footer.payment_info.is_empty());
}
