use enrollment_payments::webhook::signature::{verify_signature, SignatureError};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SECRET: &str = "whsec_test_secret";

fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn accepts_a_correctly_signed_payload() {
    let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1"}}}"#;
    let timestamp = 1_700_000_000;
    let header = format!("t={},v1={}", timestamp, sign(payload, SECRET, timestamp));

    assert!(verify_signature(payload, &header, SECRET, 300, timestamp + 10).is_ok());
}

#[test]
fn rejects_a_wrong_signature() {
    let payload = b"{}";
    let timestamp = 1_700_000_000;
    let header = format!(
        "t={timestamp},v1=0000000000000000000000000000000000000000000000000000000000000000"
    );

    let result = verify_signature(payload, &header, SECRET, 300, timestamp);
    assert!(matches!(result, Err(SignatureError::Mismatch)));
}

#[test]
fn rejects_a_tampered_payload() {
    let payload = br#"{"amount":1000}"#;
    let timestamp = 1_700_000_000;
    let header = format!("t={},v1={}", timestamp, sign(payload, SECRET, timestamp));

    let tampered = br#"{"amount":9999}"#;
    let result = verify_signature(tampered, &header, SECRET, 300, timestamp);
    assert!(matches!(result, Err(SignatureError::Mismatch)));
}

#[test]
fn rejects_a_signature_from_the_wrong_secret() {
    let payload = b"{}";
    let timestamp = 1_700_000_000;
    let header = format!("t={},v1={}", timestamp, sign(payload, "whsec_other", timestamp));

    let result = verify_signature(payload, &header, SECRET, 300, timestamp);
    assert!(matches!(result, Err(SignatureError::Mismatch)));
}

#[test]
fn rejects_a_stale_timestamp() {
    let payload = b"{}";
    let timestamp = 1_700_000_000;
    let header = format!("t={},v1={}", timestamp, sign(payload, SECRET, timestamp));

    let result = verify_signature(payload, &header, SECRET, 300, timestamp + 301);
    assert!(matches!(result, Err(SignatureError::StaleTimestamp(_))));
}

#[test]
fn rejects_a_header_without_timestamp() {
    let result = verify_signature(b"{}", "v1=abcdef", SECRET, 300, 1_700_000_000);
    assert!(matches!(result, Err(SignatureError::Malformed(_))));
}

#[test]
fn rejects_a_header_without_v1_signature() {
    let result = verify_signature(b"{}", "t=1700000000", SECRET, 300, 1_700_000_000);
    assert!(matches!(result, Err(SignatureError::Malformed(_))));
}

#[test]
fn rejects_when_no_secret_is_configured() {
    let result = verify_signature(b"{}", "t=1,v1=aa", "", 300, 1);
    assert!(matches!(result, Err(SignatureError::MissingSecret)));
}

#[test]
fn accepts_when_any_of_multiple_v1_signatures_matches() {
    let payload = b"{}";
    let timestamp = 1_700_000_000;
    let good = sign(payload, SECRET, timestamp);
    let header = format!("t={timestamp},v1=deadbeef,v1={good}");

    assert!(verify_signature(payload, &header, SECRET, 300, timestamp).is_ok());
}
