use crate::common::RESIZED_PREFIX;
use anyhow::{Result, anyhow};
use chrono::Utc;
use std::fmt;
use uuid::Uuid;

/// Unique identifier assigned to an uploaded artifact and reused across its
/// original, resized and metadata representations:
/// `{unix_millis}_{uuid}{ext}`. Generated once per upload, before any
/// sub-operation is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn generate(source_name: &str) -> Result<Self> {
        let dot = source_name
            .rfind('.')
            .ok_or_else(|| anyhow!("object name {source_name:?} has no file extension"))?;
        let ext = &source_name[dot..];
        Ok(Self(format!(
            "{}_{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            ext
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the downscaled variant stored in the secondary container.
    pub fn resized(&self) -> String {
        format!("{RESIZED_PREFIX}{}", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_pairwise_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let key = ObjectKey::generate("photo.png").unwrap();
            assert!(seen.insert(key.as_str().to_string()));
        }
    }

    #[test]
    fn extension_is_preserved() {
        let key = ObjectKey::generate("holiday.snapshot.JPG").unwrap();
        assert!(key.as_str().ends_with(".JPG"));
        // only the last extension survives
        assert!(!key.as_str().contains("snapshot"));
    }

    #[test]
    fn resized_key_is_prefixed() {
        let key = ObjectKey::generate("x.png").unwrap();
        assert_eq!(key.resized(), format!("resized-{key}"));
    }

    #[test]
    fn names_without_an_extension_are_rejected() {
        assert!(ObjectKey::generate("README").is_err());
        assert!(ObjectKey::generate("").is_err());
    }
}
