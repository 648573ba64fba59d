use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("missing signing secret")]
    MissingSecret,
    #[error("malformed signature header: {0}")]
    Malformed(String),
    #[error("timestamp outside tolerance: {0}")]
    StaleTimestamp(String),
    #[error("signature mismatch")]
    Mismatch,
}

/// Verify a `t=<unix>,v1=<hex>` signature header against the raw request body.
/// The signed payload is `"{t}.{body}"` under HMAC-SHA256 with the shared
/// signing secret. Callers must pass the body untouched; parsing it before
/// this check passes would defeat the point of signing.
pub fn verify_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance_seconds: i64,
    now_unix: i64,
) -> Result<(), SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }

    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();
    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", v)) => timestamp = v.parse().ok(),
            Some(("v1", v)) => signatures.push(v),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| SignatureError::Malformed("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed("no v1 signature".to_string()));
    }

    let drift = (now_unix - timestamp).abs();
    if drift > tolerance_seconds {
        return Err(SignatureError::StaleTimestamp(format!(
            "event timestamp {timestamp} is {drift}s from now (tolerance {tolerance_seconds}s)"
        )));
    }

    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SignatureError::Malformed(e.to_string()))?;
    mac.update(signed_payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if signatures.iter().any(|sig| constant_time_eq(expected.as_bytes(), sig.as_bytes())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
