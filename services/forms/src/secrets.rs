//! Generation and one-way hashing of the short-lived secrets in the login
//! flow: 6-digit codes, challenge ids, and session tokens.
//!
//! Plaintext secrets are never stored; the row store only ever sees the
//! hex digests produced here. Each digest input is bound to its context
//! (email + challenge id for codes, a fixed prefix for session tokens) so
//! a captured hash cannot be replayed across contexts.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Login codes are 6 decimal digits, zero-padded.
pub const CODE_LEN: usize = 6;

/// Session tokens are 32 random bytes before encoding.
const SESSION_TOKEN_BYTES: usize = 32;

pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000u32))
}

pub fn generate_challenge_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rng.fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest of a login code bound to the email and challenge id it was
/// issued for.
pub fn code_digest(code: &str, email: &str, challenge_id: &str) -> String {
    sha256_hex(&format!("code:{code}:{email}:{challenge_id}"))
}

/// Digest of a session token under the fixed session prefix.
pub fn session_digest(token: &str) -> String {
    sha256_hex(&format!("session:{token}"))
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
