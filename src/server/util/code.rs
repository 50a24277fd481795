//! Verification code generation.

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random code of `length` characters drawn from `A-Z0-9`.
///
/// Uses the thread-local cryptographically secure generator.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Normalizes user input for comparison against a generated code.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}
