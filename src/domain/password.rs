//! Reversible password obscuring for persisted job entries.
//!
//! This keeps secrets out of plain sight in job files; it is not encryption.

use crate::domain::AppError;
use crate::domain::variables::contains_variable;

pub const ENCRYPTED_PREFIX: &str = "Encrypted ";

const KEY: &[u8] = b"0933910847463829827159347601486730416058";

fn xor_with_key(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().zip(KEY.iter().cycle()).map(|(b, k)| b ^ k).collect()
}

/// Obscure `password` unless it is empty or a variable placeholder.
pub fn encrypt_password_if_not_using_variables(password: &str) -> String {
    if password.is_empty() || contains_variable(password) {
        return password.to_string();
    }
    format!("{ENCRYPTED_PREFIX}{}", hex::encode(xor_with_key(password.as_bytes())))
}

/// Reverse [`encrypt_password_if_not_using_variables`]; values without the prefix pass through.
pub fn decrypt_password_optionally_encrypted(value: &str) -> Result<String, AppError> {
    let Some(encoded) = value.strip_prefix(ENCRYPTED_PREFIX) else {
        return Ok(value.to_string());
    };

    let bytes = hex::decode(encoded.trim()).map_err(|e| AppError::ParseError {
        what: "encrypted password".into(),
        details: e.to_string(),
    })?;

    String::from_utf8(xor_with_key(&bytes)).map_err(|e| AppError::ParseError {
        what: "encrypted password".into(),
        details: e.to_string(),
    })
}
