//! Identifier Generation
//!
//! Node and edge ids are short URL-safe tokens: 8 bytes from the operating
//! system CSPRNG, base64url-encoded without padding (11 characters).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind each id
pub const ID_BYTES: usize = 8;

/// Source of fresh entity ids
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator backed by `OsRng`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        generate_id()
    }
}

/// Produce a new random id
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
