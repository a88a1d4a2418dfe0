/// Email verification tokens
///
/// A verification token proves control of an email address. The plaintext
/// token only ever appears in the link mailed to the user; the `users` table
/// stores its SHA-256 digest, and lookup happens by digest.
///
/// # Token Format
///
/// 48 random alphanumeric characters (base62), URL-safe without escaping.
///
/// # Example
///
/// ```
/// use eventhub_shared::auth::verification::{
///     generate_verification_token, hash_verification_token, is_well_formed,
/// };
///
/// let (token, digest) = generate_verification_token();
/// assert!(is_well_formed(&token));
/// assert_eq!(hash_verification_token(&token), digest);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a verification token (characters)
pub const TOKEN_LENGTH: usize = 48;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a new verification token
///
/// # Returns
///
/// Tuple of (plaintext_token, sha256_hex_digest)
pub fn generate_verification_token() -> (String, String) {
    let mut rng = rand::thread_rng();

    let token: String = (0..TOKEN_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    let digest = hash_verification_token(&token);

    (token, digest)
}

/// Hashes a verification token for storage or lookup
///
/// Returns the hex-encoded SHA-256 digest (64 characters).
pub fn hash_verification_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks the shape of a token before touching the database
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|b| b.is_ascii_alphanumeric())
}
