//! Image generation manifest (`images/{id}/manifest.json`).
//!
//! The manifest is the authoritative record of which image objects exist for
//! a job. It is written even when some images failed, and lists only keys
//! that were actually stored.

use serde::{Deserialize, Serialize};

/// Content type of manifests and archived messages.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Fields are declared in alphabetical order of their JSON names so the
/// serialized document has a stable key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageManifest {
    pub image_id: String,
    pub image_keys: Vec<String>,
    pub prompt: String,
}

impl ImageManifest {
    pub fn new(
        image_id: impl Into<String>,
        prompt: impl Into<String>,
        image_keys: Vec<String>,
    ) -> Self {
        Self {
            image_id: image_id.into(),
            image_keys,
            prompt: prompt.into(),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize with 4-space indentation, ASCII only.
    ///
    /// Non-ASCII characters are written as `\uXXXX` escapes (UTF-16 code
    /// units, lowercase hex), so readers of existing manifests see the same
    /// bytes for the same prompt.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(escape_non_ascii(&String::from_utf8_lossy(&out)).into_bytes())
    }

    /// Fold in keys recorded by a previous attempt for the same job.
    ///
    /// A key survives if this attempt stored it, or if `previous` lists it
    /// for the same image id. Only keys from `expected` are kept, and the
    /// result follows `expected` order.
    pub fn preserving(self, previous: Option<&ImageManifest>, expected: &[String]) -> Self {
        let previous_keys: &[String] = match previous {
            Some(p) if p.image_id == self.image_id => &p.image_keys,
            _ => &[],
        };

        let image_keys = expected
            .iter()
            .filter(|key| self.image_keys.contains(*key) || previous_keys.contains(*key))
            .cloned()
            .collect();

        Self { image_keys, ..self }
    }
}

/// Replace every non-ASCII character with its JSON `\u` escape.
///
/// Serialized JSON only carries non-ASCII text inside string literals, where
/// the escape is equivalent.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn serializes_with_stable_key_order_and_indent() {
        let manifest = ImageManifest::new("abc123", "a cat", keys(&["images/abc123/a_cat_0.png"]));
        let text = String::from_utf8(manifest.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n    \"imageId\": \"abc123\",\n    \"imageKeys\": [\n        \"images/abc123/a_cat_0.png\"\n    ],\n    \"prompt\": \"a cat\"\n}"
        );
    }

    #[test]
    fn non_ascii_prompt_is_escaped() {
        let manifest = ImageManifest::new("id", "café 🐱", Vec::new());
        let bytes = manifest.to_json_bytes().unwrap();

        assert!(bytes.is_ascii());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#""prompt": "caf\u00e9 \ud83d\udc31""#), "{text}");
        assert_eq!(ImageManifest::from_slice(text.as_bytes()).unwrap(), manifest);
    }

    #[test]
    fn parses_back() {
        let manifest = ImageManifest::new("id", "p", keys(&["a", "b"]));
        let parsed = ImageManifest::from_slice(&manifest.to_json_bytes().unwrap()).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn empty_key_list_serializes() {
        let manifest = ImageManifest::new("id", "p", Vec::new());
        let value: serde_json::Value =
            serde_json::from_slice(&manifest.to_json_bytes().unwrap()).unwrap();
        assert_eq!(value["imageKeys"], serde_json::json!([]));
    }

    #[test]
    fn preserving_keeps_previous_success() {
        let expected = keys(&["k0", "k1", "k2"]);
        let previous = ImageManifest::new("id", "p", keys(&["k0", "k1"]));
        let current = ImageManifest::new("id", "p", keys(&["k0", "k2"]));

        let merged = current.preserving(Some(&previous), &expected);
        assert_eq!(merged.image_keys, expected);
    }

    #[test]
    fn preserving_ignores_other_jobs() {
        let expected = keys(&["k0", "k1"]);
        let previous = ImageManifest::new("other", "p", keys(&["k1"]));
        let current = ImageManifest::new("id", "p", keys(&["k0"]));

        let merged = current.preserving(Some(&previous), &expected);
        assert_eq!(merged.image_keys, keys(&["k0"]));
    }

    #[test]
    fn preserving_drops_keys_outside_expected_set() {
        let expected = keys(&["new_0"]);
        let previous = ImageManifest::new("id", "old prompt", keys(&["old_0"]));
        let current = ImageManifest::new("id", "new", keys(&["new_0"]));

        let merged = current.preserving(Some(&previous), &expected);
        assert_eq!(merged.image_keys, keys(&["new_0"]));
    }

    #[test]
    fn preserving_without_previous_is_identity_in_expected_order() {
        let expected = keys(&["k0", "k1", "k2"]);
        let current = ImageManifest::new("id", "p", keys(&["k2", "k0"]));

        let merged = current.preserving(None, &expected);
        assert_eq!(merged.image_keys, keys(&["k0", "k2"]));
    }
}
