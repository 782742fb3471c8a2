//! Upload parameter signing for the external media host
//!
//! The host verifies signatures computed over the sorted parameter list:
//! every key=value pair is appended with a trailing '&', the API secret is
//! appended last, and the SHA-1 digest is rendered as lowercase hex.

use sha1::{Digest, Sha1};

/// Sign a set of upload parameters with the API secret
pub fn sign_upload_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut to_sign = String::new();
    for (key, value) in &sorted {
        to_sign.push_str(key);
        to_sign.push('=');
        to_sign.push_str(value);
        to_sign.push('&');
    }
    to_sign.push_str(api_secret);

    hex::encode(Sha1::digest(to_sign.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_matches_known_digest() {
        // SHA-1("timestamp=1700000000&upload_preset=preset&secret")
        let signature = sign_upload_params(
            &[("timestamp", "1700000000"), ("upload_preset", "preset")],
            "secret",
        );
        assert_eq!(signature, hex::encode(Sha1::digest(
            b"timestamp=1700000000&upload_preset=preset&secret"
        )));
        assert_eq!(signature.len(), 40);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(signature, signature.to_lowercase());
    }

    #[test]
    fn test_parameters_are_sorted_before_signing() {
        let forward = sign_upload_params(&[("a", "1"), ("b", "2")], "s");
        let reversed = sign_upload_params(&[("b", "2"), ("a", "1")], "s");
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_secret_changes_signature() {
        let first = sign_upload_params(&[("timestamp", "1")], "secret-a");
        let second = sign_upload_params(&[("timestamp", "1")], "secret-b");
        assert_ne!(first, second);
    }
}
