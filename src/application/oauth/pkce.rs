//! PKCE (RFC 7636) helpers

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

const VERIFIER_BYTES: usize = 32;
const STATE_BYTES: usize = 16;

/// Verifier/challenge pair for one login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// 32 random bytes, base64url without padding (43 characters)
    pub fn generate() -> Self {
        let bytes: [u8; VERIFIER_BYTES] = rand::random();
        let verifier = URL_SAFE_NO_PAD.encode(bytes);
        let challenge = challenge_for(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// S256 challenge: base64url(SHA-256(verifier)), no padding
pub fn challenge_for(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Opaque `state` value for the authorization request
pub fn generate_state() -> String {
    let bytes: [u8; STATE_BYTES] = rand::random();
    hex::encode(bytes)
}
