//! # Type keys
//!
//! A [`TypeKey`] is a hashed surrogate for the name of a cell kind, a query kind or
//! a calculator base. The registries are keyed on these instead of `TypeId` so that
//! names stay stable across crates and can be reconstructed from strings read
//! back out of a file.
//!
//! Keys compare and hash by their 64 bit value only. Two names that collide are
//! treated as the same key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64 bit FNV-1a over the bytes of `name`
const fn fnv1a(name: &str) -> u64 {
    let bytes = name.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Hashed identifier of a named type.
///
/// The original name is kept alongside the hash when it is known at compile time so
/// that diagnostics stay readable. It takes no part in comparisons.
#[derive(Clone, Copy)]
pub struct TypeKey {
    hash: u64,
    name: Option<&'static str>,
}

impl TypeKey {
    /// The distinguished "no type" key. It never equals a key built from a non-empty name.
    pub const INVALID: TypeKey = TypeKey {
        hash: 0,
        name: None,
    };

    /// Build a key from a registration name. An empty name yields [`TypeKey::INVALID`].
    pub const fn from_name(name: &'static str) -> TypeKey {
        if name.is_empty() {
            return TypeKey::INVALID;
        }

        TypeKey {
            hash: fnv1a(name),
            name: Some(name),
        }
    }

    /// Build a key from a name only known at runtime (a name read from a file, for
    /// instance). The result equals `from_name` of the same string but carries no name.
    pub fn hashed(name: &str) -> TypeKey {
        if name.is_empty() {
            return TypeKey::INVALID;
        }

        TypeKey {
            hash: fnv1a(name),
            name: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.hash != 0
    }

    /// the raw hash value
    pub fn id(&self) -> u64 {
        self.hash
    }

    /// the registration name, if this key was built from a static string
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl Default for TypeKey {
    fn default() -> Self {
        TypeKey::INVALID
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state)
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "TypeKey({name:?}, {:#018x})", self.hash),
            None => write!(f, "TypeKey({:#018x})", self.hash),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_valid(), self.name) {
            (false, _) => write!(f, "<invalid>"),
            (true, Some(name)) => write!(f, "{name}"),
            (true, None) => write!(f, "#{:016x}", self.hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_key() {
        const TET: TypeKey = TypeKey::from_name("vtkDGTet");
        assert_eq!(TET, TypeKey::from_name("vtkDGTet"));
        assert_eq!(TET, TypeKey::hashed("vtkDGTet"));
        assert_ne!(TET, TypeKey::from_name("vtkDGHex"));
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(!TypeKey::from_name("").is_valid());
        assert!(!TypeKey::hashed("").is_valid());
        assert!(!TypeKey::default().is_valid());
        assert!(TypeKey::from_name("a").is_valid());
        assert_ne!(TypeKey::from_name("a"), TypeKey::INVALID);
    }

    #[test]
    fn display_prefers_name() {
        assert_eq!(TypeKey::from_name("vtkDGTri").to_string(), "vtkDGTri");
        assert_eq!(TypeKey::INVALID.to_string(), "<invalid>");
        assert!(TypeKey::hashed("vtkDGTri").to_string().starts_with('#'));
    }

    #[test]
    fn known_fnv_value() {
        // reference value of 64 bit FNV-1a for "a"
        assert_eq!(TypeKey::hashed("a").id(), 0xaf63dc4c8601ec8c);
    }
}
