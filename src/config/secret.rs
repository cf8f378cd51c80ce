//! API token protection
//!
//! Both remote systems authenticate with long-lived tokens that arrive via
//! the config file or environment. Tokens are held as [`SecretString`]
//! values for their whole lifetime: memory is zeroed on drop and the Debug
//! representation is redacted, so a token cannot leak through logs, crash
//! reports, or a stray `{:?}`. Reading the value requires an explicit
//! `expose_secret()` call at the request-building site.

use secrecy::{CloneableSecret, DebugSecret, Secret};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// String newtype carrying the traits `Secret` needs
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

// Comparison against the raw token, used by request builders and tests
impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Deserialize only: tokens come in from TOML, they are never written back
// out.
impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A zero-on-drop, redacted-Debug API token
pub type SecretString = Secret<SecretValue>;

/// Wraps a raw token string in a [`SecretString`]
///
/// # Example
///
/// ```rust
/// use consentsync::config::secret_string;
///
/// let token = secret_string("redcap-api-token".to_string());
/// ```
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_expose_returns_the_token() {
        let token = secret_string("ripple-token".to_string());
        assert_eq!(token.expose_secret(), "ripple-token");
        assert_eq!(token.expose_secret().as_ref(), "ripple-token");
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let token = secret_string("do-not-print-me".to_string());
        let debug_output = format!("{token:?}");
        assert!(!debug_output.contains("do-not-print-me"));
    }

    #[test]
    fn test_clone_preserves_the_token() {
        // Config structs holding tokens are Clone; the copy must carry the
        // same value
        let token = secret_string("ripple-token".to_string());
        let copy = token.clone();
        assert_eq!(copy.expose_secret(), "ripple-token");
    }

    #[test]
    fn test_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Auth {
            api_token: SecretString,
        }

        let auth: Auth = toml::from_str("api_token = \"from-the-file\"").unwrap();
        assert_eq!(auth.api_token.expose_secret(), "from-the-file");
    }
}
