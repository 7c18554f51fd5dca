use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a key seed from a document label using CRC32
pub fn get_document_seed(label: &str) -> String {
    let mut buff = String::from(label);
    if !label.starts_with("resume://") {
        buff = format!("resume://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stable identity of a list item, independent of its index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Sequential key generator for list items within a document
///
/// The counter only moves forward, so a key that was removed is never
/// handed out again.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    seed: String, // Document seed (CRC32)
    count: u64,   // Sequential counter
}

impl KeyGenerator {
    pub fn new(label: &str) -> Self {
        Self {
            seed: get_document_seed(label),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential key
    pub fn next_key(&mut self) -> ItemKey {
        self.count += 1;
        ItemKey(format!("{}-{}", self.seed, self.count))
    }

    /// Get document seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of keys issued so far
    pub fn issued(&self) -> u64 {
        self.count
    }
}
