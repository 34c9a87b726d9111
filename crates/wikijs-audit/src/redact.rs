//! Recursive redaction of secret-bearing keys.

use serde_json::{Map, Value};

/// Marker that replaces every redacted value.
pub const REDACTED: &str = "[REDACTED]";

/// Normalized key names that always carry secrets.
const SENSITIVE_KEYS: &[&str] = &[
    "token",
    "apitoken",
    "accesstoken",
    "refreshtoken",
    "confirmtoken",
    "confirm",
    "password",
    "passwd",
    "secret",
    "clientsecret",
    "credential",
    "credentials",
    "key",
    "apikey",
    "privatekey",
    "authorization",
    "auth",
    "bearer",
    "cookie",
];

/// Suffixes that mark a normalized key as sensitive (`wikiApiToken`, `db_password`).
const SENSITIVE_SUFFIXES: &[&str] = &["token", "secret", "password", "apikey"];

/// Whether `key` names a secret. Case, `_` and `-` are ignored.
pub fn is_sensitive_key(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();

    SENSITIVE_KEYS.contains(&normalized.as_str())
        || SENSITIVE_SUFFIXES
            .iter()
            .any(|suffix| normalized.ends_with(suffix))
}

/// Return a copy of `value` with every sensitive key's value replaced by [`REDACTED`].
///
/// Objects nested inside arrays are walked with the same rule.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    let replaced = if is_sensitive_key(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact(inner)
                    };
                    (key.clone(), replaced)
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}
