//! Password credential hashing (argon2id, PHC string format).

use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a plaintext password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC string.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Stand-in hash for accounts that do not exist, so a lookup miss costs the
/// same argon2 work as a wrong password.
static ABSENT_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("absent-account").ok());

/// Run a full verification against [`ABSENT_ACCOUNT_HASH`]. Always `false`.
pub fn verify_absent(password: &str) -> bool {
    if let Some(hash) = ABSENT_ACCOUNT_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}
