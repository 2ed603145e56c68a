//! Canonical cache key generation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Deterministic identifier for logically equivalent requests.
///
/// Two payloads that differ only in JSON object field order produce equal
/// keys; any semantic difference produces distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Derive a key covering an entire payload.
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        CacheKeyGenerator::new().generate(payload)
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Produces [`CacheKey`]s by hashing a canonical rendering of the payload.
pub struct CacheKeyGenerator {
    salt: Option<String>,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self { salt: None }
    }

    /// Namespace keys, e.g. per provider account, so identical payloads
    /// sent through different orchestrators never collide.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn generate(&self, payload: &serde_json::Value) -> CacheKey {
        let mut hasher = Sha256::new();
        if let Some(ref salt) = self.salt {
            hasher.update(salt.as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(canonical_json(payload).as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        CacheKey::new(hash)
    }
}

impl Default for CacheKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render JSON with object keys sorted recursively so that field order
/// never influences the hash. Array order is semantic and preserved.
fn canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: BTreeMap<&String, String> = map
                .iter()
                .map(|(k, v)| (k, canonical_json(v)))
                .collect();
            let inner: Vec<String> = sorted
                .iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap_or_default(), v))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        serde_json::Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", inner.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_order_does_not_change_key() {
        let a = json!({"prompt": "haiku about rust", "temperature": 0.7});
        let b = json!({"temperature": 0.7, "prompt": "haiku about rust"});
        assert_eq!(CacheKey::from_payload(&a), CacheKey::from_payload(&b));
    }

    #[test]
    fn nested_field_order_does_not_change_key() {
        let a = json!({"opts": {"b": 1, "a": 2}, "prompt": "x"});
        let b = json!({"prompt": "x", "opts": {"a": 2, "b": 1}});
        assert_eq!(CacheKey::from_payload(&a), CacheKey::from_payload(&b));
    }

    #[test]
    fn semantic_difference_changes_key() {
        let a = json!({"prompt": "haiku"});
        let b = json!({"prompt": "sonnet"});
        assert_ne!(CacheKey::from_payload(&a), CacheKey::from_payload(&b));
    }

    #[test]
    fn array_order_is_semantic() {
        let a = json!({"messages": ["hi", "there"]});
        let b = json!({"messages": ["there", "hi"]});
        assert_ne!(CacheKey::from_payload(&a), CacheKey::from_payload(&b));
    }

    #[test]
    fn salt_namespaces_keys() {
        let payload = json!({"prompt": "haiku"});
        let plain = CacheKeyGenerator::new().generate(&payload);
        let salted = CacheKeyGenerator::new().with_salt("acct-a").generate(&payload);
        assert_ne!(plain, salted);
    }

    #[test]
    fn salted_keys_are_stable() {
        let payload = json!({"prompt": "haiku"});
        let gen = CacheKeyGenerator::new().with_salt("acct-a");
        assert_eq!(gen.generate(&payload), gen.generate(&payload));
    }
}
