//! RFC 6238 time-based one-time passwords (SHA-1, 6 digits, 30 s step)

use base64::{engine::general_purpose::STANDARD, Engine as _};
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use qrcode::render::svg;
use qrcode::QrCode;
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

pub const SECRET_BYTES: usize = 20;
pub const DIGITS: u32 = 6;
pub const STEP_SECS: u64 = 30;
/// Accepted clock drift, in steps either side of now
pub const SKEW_STEPS: u64 = 1;

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("Stored secret is not valid base32")]
    InvalidSecret,

    #[error("Failed to render QR code: {0}")]
    QrCode(String),
}

/// Fresh random shared secret, base32 without padding
pub fn generate_secret() -> String {
    let bytes: [u8; SECRET_BYTES] = rand::random();
    BASE32_NOPAD.encode(&bytes)
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, TotpError> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| TotpError::InvalidSecret)
}

fn hotp(key: &[u8], counter: u64, digits: u32) -> Result<u32, TotpError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| TotpError::InvalidSecret)?;
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();

    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        hash[offset] & 0x7f,
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ]);
    Ok(binary % 10u32.pow(digits))
}

/// Code for the step containing `unix_secs`
pub fn code_at(secret: &str, unix_secs: u64) -> Result<String, TotpError> {
    let key = decode_secret(secret)?;
    let code = hotp(&key, unix_secs / STEP_SECS, DIGITS)?;
    Ok(format!("{:0width$}", code, width = DIGITS as usize))
}

/// Check `token` against the current step and its neighbours
pub fn verify(secret: &str, token: &str, unix_secs: u64) -> Result<bool, TotpError> {
    let token = token.trim();
    if token.len() != DIGITS as usize || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(false);
    }

    let key = decode_secret(secret)?;
    let current = unix_secs / STEP_SECS;
    let first = current.saturating_sub(SKEW_STEPS);

    for counter in first..=current + SKEW_STEPS {
        let code = format!("{:0width$}", hotp(&key, counter, DIGITS)?, width = DIGITS as usize);
        if code == token {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `otpauth://` provisioning URI understood by authenticator apps
pub fn otpauth_uri(issuer: &str, account: &str, secret: &str) -> String {
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
        urlencoding::encode(issuer),
        urlencoding::encode(account),
        secret,
        urlencoding::encode(issuer),
        DIGITS,
        STEP_SECS
    )
}

/// SVG QR code for `data`, as a `data:` URL
pub fn qr_data_url(data: &str) -> Result<String, TotpError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| TotpError::QrCode(e.to_string()))?;
    let svg = code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .build();
    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Base32 of the RFC 6238 SHA-1 seed "12345678901234567890"
    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn test_rfc6238_vectors() {
        assert_eq!(code_at(RFC_SECRET, 59).unwrap(), "287082");
        assert_eq!(code_at(RFC_SECRET, 1111111109).unwrap(), "081804");
        assert_eq!(code_at(RFC_SECRET, 1234567890).unwrap(), "005924");
        assert_eq!(code_at(RFC_SECRET, 2000000000).unwrap(), "279037");
    }

    #[test]
    fn test_verify_tolerates_one_step_of_drift() {
        let now = 1_700_000_000;
        let previous = code_at(RFC_SECRET, now - STEP_SECS).unwrap();
        let next = code_at(RFC_SECRET, now + STEP_SECS).unwrap();
        let too_old = code_at(RFC_SECRET, now - 3 * STEP_SECS).unwrap();

        assert!(verify(RFC_SECRET, &previous, now).unwrap());
        assert!(verify(RFC_SECRET, &next, now).unwrap());
        assert!(!verify(RFC_SECRET, &too_old, now).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_tokens() {
        for token in ["", "12345", "1234567", "abcdef", "12 345"] {
            assert!(!verify(RFC_SECRET, token, 59).unwrap(), "{}", token);
        }
    }

    #[test]
    fn test_generated_secret_round_trips() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 32);
        let code = code_at(&secret, 1_700_000_000).unwrap();
        assert!(verify(&secret, &code, 1_700_000_000).unwrap());
    }

    #[test]
    fn test_invalid_secret() {
        assert!(matches!(code_at("not base32!", 0), Err(TotpError::InvalidSecret)));
    }

    #[test]
    fn test_otpauth_uri() {
        let uri = otpauth_uri("HospitalApp", "ada@example.com", RFC_SECRET);
        assert_eq!(
            uri,
            "otpauth://totp/HospitalApp:ada%40example.com?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&issuer=HospitalApp&algorithm=SHA1&digits=6&period=30"
        );
    }

    #[test]
    fn test_qr_data_url() {
        let url = qr_data_url("otpauth://totp/HospitalApp:ada").unwrap();
        assert!(url.starts_with("data:image/svg+xml;base64,"));
        let svg = STANDARD
            .decode(url.trim_start_matches("data:image/svg+xml;base64,"))
            .unwrap();
        assert!(String::from_utf8(svg).unwrap().contains("<svg"));
    }
}
