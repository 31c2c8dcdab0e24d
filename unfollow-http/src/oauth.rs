//! OAuth 1.0a (HMAC-SHA1) request signing.
//!
//! User-context calls to the v1.1 REST API must carry an `Authorization`
//! header signed over the method, the bare URL and every query parameter.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::RngCore;
use sha1::Sha1;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::HttpError;

/// Everything except the RFC 3986 unreserved set: ALPHA / DIGIT / "-" / "." / "_" / "~"
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Holds the four account secrets and produces `Authorization` headers.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Signer").finish_non_exhaustive()
    }
}

impl OAuth1Signer {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Build the `Authorization` header for one request.
    ///
    /// `url` must not carry a query string; query parameters go in `params`.
    pub fn authorization(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| HttpError::Build(format!("system clock before epoch: {e}")))?
            .as_secs()
            .to_string();
        self.authorization_at(method, url, params, &timestamp, &generate_nonce())
    }

    fn authorization_at(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, HttpError> {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", "1.0"),
        ];

        // Parameters are sorted after encoding, by key then value.
        let mut encoded: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        encoded.sort();
        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_ascii_uppercase(),
            encode(url),
            encode(&param_string)
        );
        let signing_key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| HttpError::Build(format!("oauth signing key rejected: {e}")))?;
        mac.update(base_string.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort_by(|a, b| a.0.cmp(b.0));
        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the platform's "Creating a signature" guide.
    fn reference_signer() -> OAuth1Signer {
        OAuth1Signer::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    #[test]
    fn matches_reference_signature() {
        let header = reference_signer()
            .authorization_at(
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json",
                &[
                    ("include_entities", "true"),
                    ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
                ],
                "1318622958",
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            )
            .unwrap();

        assert!(
            header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""),
            "{header}"
        );
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode("hello world"), "hello%20world");
        assert_eq!(encode("foo=bar&baz"), "foo%3Dbar%26baz");
        assert_eq!(encode("test-value_1.2~"), "test-value_1.2~");
        assert_eq!(encode("a+b/c"), "a%2Bb%2Fc");
    }

    #[test]
    fn nonces_are_random_hex() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", reference_signer());
        assert!(!rendered.contains("kAcSOq"));
    }
}
