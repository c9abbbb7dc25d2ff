use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Parameters that travel with a request but are never part of the signature.
const UNSIGNED: [&str; 5] = ["file", "api_key", "cloud_name", "resource_type", "signature_algorithm"];

/// Signs an asset-host request.
///
/// The signed parameters are joined as `key=value` pairs with `&` in
/// alphabetical key order, the API secret is appended, and the SHA-256 digest
/// of that string is returned as lowercase hex.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(key, value)| !UNSIGNED.contains(*key) && !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
