// src/ident.rs

//! Random identifier generation for injected field names.
//!
//! Names are drawn uniformly from `[A-Za-z0-9]` using the thread-local
//! generator. There is deliberately no uniqueness tracking here; callers that
//! need collision-free names layer their own check on top (see
//! `ArtInjector::with_unique_names`).

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default length of a generated field name.
pub const DEFAULT_LEN: usize = 8;

/// Generate a random alphanumeric identifier of the given length.
pub fn random_identifier(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_length_and_alphabet() {
        for _ in 0..64 {
            let name = random_identifier(DEFAULT_LEN);
            assert_eq!(name.len(), 8);
            assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_custom_length() {
        assert_eq!(random_identifier(1).len(), 1);
        assert_eq!(random_identifier(32).len(), 32);
        assert!(random_identifier(0).is_empty());
    }
}
