use md5::{Digest, Md5};
use sha1::Sha1;

/// Lowercase hex MD5 of a string.
pub fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Lowercase hex SHA-1 of a string.
pub fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Secret sent with the application code request: `md5(app_secret)`.
pub fn app_code_secret(app_secret: &str) -> String {
    md5_hex(app_secret)
}

/// Secret sent with the application token request: `md5(app_secret + app_code)`.
pub fn app_token_secret(app_secret: &str, app_code: &str) -> String {
    md5_hex(&format!("{}{}", app_secret, app_code))
}
