use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque session token minted by the server at session creation.
///
/// Tokens are capability-like identifiers: random v4 UUIDs from the OS RNG,
/// so they carry no timestamp and cannot be guessed from earlier tokens.
/// Immutable once assigned; identity key of the session registry.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh token.
    pub fn generate() -> Self {
        Self(format!("sess_{}", Uuid::new_v4()))
    }

    /// Wrap a client-supplied header value. No validation happens here —
    /// unknown tokens simply miss in the registry.
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_tokens_have_prefix() {
        let token = SessionToken::generate();
        assert!(token.as_str().starts_with("sess_"), "got: {token}");
    }

    #[test]
    fn generated_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100)
            .map(|_| SessionToken::generate().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn from_raw_preserves_value() {
        let token = SessionToken::from_raw("sess_custom");
        assert_eq!(token.as_str(), "sess_custom");
        assert_eq!(token.to_string(), "sess_custom");
    }

    #[test]
    fn serde_roundtrip_is_transparent() {
        let token = SessionToken::generate();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{token}\""));
        let parsed: SessionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(token, parsed);
    }
}
