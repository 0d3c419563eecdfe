//! SSH public key parsing for controller registration.

use crate::domain::error::LifecycleError;

/// Key name used when the key file carries no comment field.
pub const DEFAULT_KEY_NAME: &str = "servicemanager";

/// A public key ready to be registered with the cloud controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub name: String,
    pub content: String,
}

/// Parses the content of an OpenSSH public key file.
///
/// Accepts `<type> <base64-material> [name]`. DSA keys are refused; the
/// controller only accepts the RSA family.
///
/// # Errors
///
/// Returns [`LifecycleError::UnsupportedKeyType`] for DSA keys or files
/// without key material.
pub fn parse_public_key(source: &str, content: &str) -> Result<PublicKey, LifecycleError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    let unsupported = |reason: String| LifecycleError::UnsupportedKeyType {
        path: source.to_owned(),
        reason,
    };

    let (key_type, material) = match fields.as_slice() {
        [key_type, material, ..] => (*key_type, *material),
        _ => return Err(unsupported("malformed key file (expected '<type> <key> [name]')".into())),
    };

    if matches!(key_type, "ssh-dsa" | "ssh-dss") {
        return Err(unsupported(format!(
            "'{key_type}' is not an RSA key; only RSA keys are accepted"
        )));
    }

    let name = fields
        .get(2)
        .map_or(DEFAULT_KEY_NAME, |n| *n)
        .to_owned();

    Ok(PublicKey {
        name,
        content: material.to_owned(),
    })
}
