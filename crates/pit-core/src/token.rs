//! Random, self-validating identifiers
//!
//! Tokens name a collection's remote namespace. They use a lowercase
//! alphanumeric alphabet, always start with a letter, and end with a
//! checksum character so any consumer can reject a mistyped token without
//! asking the store.
//!
//! The checksum sums the bytes of the prefix *excluding its final
//! character*. Existing remote object names were minted this way, so the
//! scheme must not be "fixed".

use rand::Rng;

/// Characters a token may contain.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Characters allowed in the first position.
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Length of a collection token, checksum included.
pub const COLLECTION_TOKEN_LEN: usize = 8;

/// Compute the checksum character for a token prefix.
///
/// The last character of `prefix` is not part of the sum.
pub fn checksum_char(prefix: &str) -> char {
    let bytes = prefix.as_bytes();
    let summed = &bytes[..bytes.len().saturating_sub(1)];
    let total: usize = summed.iter().map(|&b| b as usize).sum();
    ALPHABET[total % ALPHABET.len()] as char
}

/// Generate a random token of `len` characters (checksum included).
///
/// # Panics
///
/// Panics if `len < 2`; a token needs at least one letter and a checksum.
pub fn generate(len: usize) -> String {
    assert!(len >= 2, "token length must be at least 2, got {len}");

    let mut rng = rand::thread_rng();
    let mut token = String::with_capacity(len);
    token.push(LETTERS[rng.gen_range(0..LETTERS.len())] as char);
    for _ in 1..len - 1 {
        token.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    let check = checksum_char(&token);
    token.push(check);
    token
}

/// Generate a fresh collection token.
pub fn generate_collection_token() -> String {
    generate(COLLECTION_TOKEN_LEN)
}

/// Check a token's alphabet, first character and checksum.
pub fn is_valid(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() < 2 || !LETTERS.contains(&bytes[0]) {
        return false;
    }
    if !bytes.iter().all(|b| ALPHABET.contains(b)) {
        return false;
    }
    let (prefix, last) = token.split_at(token.len() - 1);
    last.chars().next() == Some(checksum_char(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_hand_computation() {
        // 'a' + 'b' = 97 + 98 = 195, 195 % 36 = 15 -> 'p'; 'c' is excluded
        assert_eq!(checksum_char("abc"), 'p');
    }

    #[test]
    fn generated_collection_token_has_expected_shape() {
        let token = generate_collection_token();
        assert_eq!(token.len(), COLLECTION_TOKEN_LEN);
        assert!(token.as_bytes()[0].is_ascii_lowercase());
        assert!(is_valid(&token));
    }

    #[test]
    fn tokens_are_random() {
        assert_ne!(generate(16), generate(16));
    }

    #[test]
    fn flipped_checksum_is_rejected() {
        let token = generate_collection_token();
        let (prefix, last) = token.split_at(token.len() - 1);
        let wrong = if last == "a" { "b" } else { "a" };
        assert!(!is_valid(&format!("{prefix}{wrong}")));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(!is_valid(""));
        assert!(!is_valid("a"));
        assert!(!is_valid("1bcdefgh"));
        assert!(!is_valid("ABCDEFGH"));
        assert!(!is_valid("abc-defg"));
    }
}
