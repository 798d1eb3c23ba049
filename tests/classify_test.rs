// Classification and field extraction through the public API
use proptest::prelude::*;

use qr_scanner::qr::{classify, extract_fields, ParsedFields, QrCodeType};

const KNOWN_PREFIXES: [&str; 10] = [
    "http://", "https://", "www.", "WIFI:", "BEGIN:VCARD", "MECARD:", "geo:", "sms:", "tel:", "mailto:",
];

fn fields_of(raw: &str) -> ParsedFields {
    let parsed = classify(raw);
    extract_fields(&parsed.content, parsed.kind)
}

#[test]
fn test_scenario_url() {
    let parsed = classify("https://example.com");
    assert_eq!(parsed.kind, QrCodeType::Url);
    assert_eq!(parsed.content, "https://example.com");
}

#[test]
fn test_scenario_wifi() {
    let raw = "WIFI:S:MyNet;T:WPA;P:secret;;";
    assert_eq!(classify(raw).kind, QrCodeType::Wifi);
    assert_eq!(
        fields_of(raw),
        ParsedFields::Wifi {
            ssid: "MyNet".to_string(),
            password: "secret".to_string(),
            security_type: "WPA".to_string(),
        }
    );
}

#[test]
fn test_scenario_geo() {
    let raw = "geo:37.7,-122.4";
    assert_eq!(classify(raw).kind, QrCodeType::Geo);
    assert_eq!(
        fields_of(raw),
        ParsedFields::Geo { latitude: "37.7".to_string(), longitude: "-122.4".to_string() }
    );
}

#[test]
fn test_scenario_plain_text() {
    let parsed = classify("plain text");
    assert_eq!(parsed.kind, QrCodeType::Text);
    assert_eq!(parsed.content, "plain text");
    assert_eq!(fields_of("plain text"), ParsedFields::Text { text: "plain text".to_string() });
}

#[test]
fn test_vcard_and_mecard_both_contacts() {
    let vcard = "BEGIN:VCARD\nVERSION:3.0\nFN:John Doe\nTEL:123456789\nEMAIL:john@example.com\nEND:VCARD";
    let mecard = "MECARD:N:Doe,John;TEL:123456789;EMAIL:john@example.com;;";

    assert_eq!(classify(vcard).kind, QrCodeType::Contact);
    assert_eq!(classify(mecard).kind, QrCodeType::Contact);

    match (fields_of(vcard), fields_of(mecard)) {
        (
            ParsedFields::Contact { name: v_name, phone: v_phone, email: v_email },
            ParsedFields::Contact { name: m_name, phone: m_phone, email: m_email },
        ) => {
            assert_eq!(v_name, "John Doe");
            assert_eq!(m_name, "Doe,John");
            assert_eq!(v_phone, m_phone);
            assert_eq!(v_email, m_email);
        }
        other => panic!("unexpected fields: {other:?}"),
    }
}

#[test]
fn test_sms_phone_email_scenarios() {
    assert_eq!(
        fields_of("sms:+123456789:Hello there!"),
        ParsedFields::Sms { phone: "+123456789".to_string(), message: "Hello there!".to_string() }
    );
    assert_eq!(fields_of("tel:+123456789"), ParsedFields::Phone { phone: "+123456789".to_string() });
    assert_eq!(
        fields_of("mailto:john@example.com?subject=Hello&body=How are you?"),
        ParsedFields::Email {
            email: "john@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "How are you?".to_string(),
        }
    );
}

#[test]
fn test_extraction_never_panics_on_truncated_payloads() {
    for raw in ["WIFI:", "BEGIN:VCARD", "MECARD:", "geo:", "sms:", "tel:", "mailto:", "mailto:?subject="] {
        let parsed = classify(raw);
        let _ = extract_fields(&parsed.content, parsed.kind);
    }
}

fn url_prefix() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("http://"), Just("https://"), Just("www.")]
}

proptest! {
    #[test]
    fn url_prefixes_classify_as_url(prefix in url_prefix(), rest in "[a-z0-9./?=&-]{0,40}", pad in "[ \t\n]{0,3}") {
        let raw = format!("{pad}{prefix}{rest}{pad}");
        let parsed = classify(&raw);
        prop_assert_eq!(parsed.kind, QrCodeType::Url);
        prop_assert_eq!(parsed.content, raw.trim());
    }

    #[test]
    fn unmatched_input_is_text(raw in "\\PC{0,60}") {
        let trimmed = raw.trim();
        prop_assume!(!KNOWN_PREFIXES.iter().any(|p| trimmed.starts_with(p)));
        prop_assert_eq!(classify(&raw).kind, QrCodeType::Text);
    }

    #[test]
    fn trimming_is_absorbed(raw in "\\s{0,3}\\PC{0,60}\\s{0,3}") {
        prop_assert_eq!(classify(raw.trim()), classify(&raw));
    }

    #[test]
    fn extraction_is_total(raw in "(WIFI:|BEGIN:VCARD|MECARD:|geo:|sms:|tel:|mailto:)?\\PC{0,80}") {
        let parsed = classify(&raw);
        let _ = extract_fields(&parsed.content, parsed.kind);
    }
}
