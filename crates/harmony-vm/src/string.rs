//! Interned JavaScript strings
//!
//! Property names reach traps as strings, so every key the protocol hands
//! out goes through the intern table and compares by content hash first.

use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Global string intern table
static STRING_TABLE: std::sync::LazyLock<DashMap<Arc<str>, Arc<JsString>>> =
    std::sync::LazyLock::new(DashMap::new);

/// An interned JavaScript string
#[derive(Clone)]
pub struct JsString {
    /// The actual string data
    data: Arc<str>,
    /// Precomputed hash for fast lookup
    hash: u64,
}

impl JsString {
    /// Create or retrieve an interned string (using global table)
    pub fn intern(s: &str) -> Arc<Self> {
        if let Some(existing) = STRING_TABLE.get(s) {
            return existing.clone();
        }

        let data: Arc<str> = Arc::from(s);
        let js_str = Arc::new(Self {
            hash: Self::compute_hash(s),
            data: data.clone(),
        });

        STRING_TABLE
            .entry(data)
            .or_insert_with(|| js_str.clone())
            .clone()
    }

    /// Get the string as a str slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Get the length in UTF-16 code units (for JS compatibility)
    pub fn len_utf16(&self) -> usize {
        self.data.encode_utf16().count()
    }

    /// Check if string is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get precomputed hash value
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Parse this string as a canonical array index ("0", "17", never "017").
    pub fn as_array_index(&self) -> Option<u32> {
        let s = self.as_str();
        if s.is_empty() || s.len() > 10 {
            return None;
        }
        if s.len() > 1 && s.starts_with('0') {
            return None;
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // 2^32 - 1 is not an index
        s.parse::<u64>()
            .ok()
            .filter(|n| *n < u32::MAX as u64)
            .map(|n| n as u32)
    }

    fn compute_hash(s: &str) -> u64 {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        hasher.finish()
    }
}

impl std::fmt::Debug for JsString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsString({:?})", self.data)
    }
}

impl std::fmt::Display for JsString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        self.data == other.data
    }
}

impl Eq for JsString {}

impl Hash for JsString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl AsRef<str> for JsString {
    fn as_ref(&self) -> &str {
        &self.data
    }
}

/// Well-known interned strings (for property names)
pub mod well_known {
    use super::*;
    use std::sync::LazyLock;

    macro_rules! well_known_string {
        ($name:ident, $value:literal) => {
            /// Well-known string constant
            pub static $name: LazyLock<Arc<JsString>> = LazyLock::new(|| JsString::intern($value));
        };
    }

    well_known_string!(LENGTH, "length");
    well_known_string!(PROTOTYPE, "prototype");
    well_known_string!(CONSTRUCTOR, "constructor");
    well_known_string!(NAME, "name");
    well_known_string!(VALUE, "value");
    well_known_string!(WRITABLE, "writable");
    well_known_string!(ENUMERABLE, "enumerable");
    well_known_string!(CONFIGURABLE, "configurable");
    well_known_string!(GET, "get");
    well_known_string!(SET, "set");
    well_known_string!(TO_STRING, "toString");
}
