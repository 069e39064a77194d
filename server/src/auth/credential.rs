use sha2::{Digest, Sha256};

/// The single shared admin secret.
///
/// Only a SHA-256 digest is kept; candidates are hashed and compared in
/// constant time so neither length nor shared prefix leaks through timing.
#[derive(Clone)]
pub struct AdminCredential {
    digest: [u8; 32],
}

impl AdminCredential {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: digest(secret),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(&self.digest, &digest(candidate))
    }
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminCredential(..)")
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
