// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Scrypt,
};
use zeroize::Zeroize;

/// Fixed KDF work factor: log2 of the scrypt cost parameter
pub const WORK_FACTOR_LOG2: u8 = 12;

fn kdf_params() -> anyhow::Result<scrypt::Params> {
    scrypt::Params::new(WORK_FACTOR_LOG2, 8, 1, scrypt::Params::RECOMMENDED_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))
}

/// Hash a password using scrypt with a fresh random salt. The PHC output
/// string carries its own parameters, so verification needs no side channel.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, kdf_params()?, &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a PHC hash string. A mismatch is `Ok(false)`,
/// never an error; only a malformed hash string fails. Comparison inside
/// the hasher is constant-time.
pub fn verify_password(hash: &str, plain: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("malformed password hash: {e}"))?;
    match Scrypt.verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("password verification failed: {e}")),
    }
}

/// Hash a password and zeroize the plaintext buffer
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain);
    plain.zeroize();
    hash
}

/// Verify a password and zeroize the plaintext buffer
pub fn verify_password_secure(hash: &str, plain: &mut String) -> anyhow::Result<bool> {
    let matched = verify_password(hash, plain);
    plain.zeroize();
    matched
}
