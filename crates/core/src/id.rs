//! Document identifiers.
//!
//! Identifiers are 12 bytes rendered as 24 hexadecimal characters, the format
//! produced by document stores for their primary keys:
//!
//! | bytes  | content                               |
//! |--------|---------------------------------------|
//! | 0..4   | creation time, Unix seconds, big-endian |
//! | 4..9   | random value fixed for the process     |
//! | 9..12  | incrementing counter, big-endian       |

use core::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

const ID_BYTES: usize = 12;
const ID_HEX_LEN: usize = ID_BYTES * 2;
const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Identifier of a stored document.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; ID_BYTES]);

struct Generator {
    process_unique: [u8; 5],
    counter: AtomicU32,
}

fn generator() -> &'static Generator {
    static GENERATOR: OnceLock<Generator> = OnceLock::new();
    GENERATOR.get_or_init(|| Generator {
        process_unique: rand::random(),
        counter: AtomicU32::new(rand::random::<u32>() & COUNTER_MASK),
    })
}

impl DocumentId {
    /// Allocate a fresh identifier.
    ///
    /// Identifiers generated by one process within the same second differ in
    /// their counter bytes; the counter wraps after 2^24 allocations.
    pub fn generate() -> Self {
        let generator = generator();
        let secs = Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        let count = generator.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&generator.process_unique);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Whether `s` is a syntactically valid identifier: exactly 24 hex
    /// characters, either case.
    pub fn is_valid(s: &str) -> bool {
        s.len() == ID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Parse an identifier. Case-insensitive; the parsed value renders in lowercase.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if !Self::is_valid(s) {
            return Err(DomainError::invalid_id(format!(
                "DocumentId: {s:?} is not {ID_HEX_LEN} hexadecimal characters"
            )));
        }

        let mut bytes = [0u8; ID_BYTES];
        for (i, pair) in s.as_bytes().chunks_exact(2).enumerate() {
            bytes[i] = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
        }
        Ok(Self(bytes))
    }
}

// Callers only pass bytes already checked by `is_valid`.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DocumentId({self})")
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_known_good_id() {
        assert!(DocumentId::is_valid("5f7777777777777777777777"));
        assert!(DocumentId::is_valid("65A1B2C3D4E5F60718293A4B"));
    }

    #[test]
    fn rejects_non_hex_and_wrong_length() {
        assert!(!DocumentId::is_valid("5f77777777777777777777k"));
        assert!(!DocumentId::is_valid("5f7777777777777777777k77"));
        assert!(!DocumentId::is_valid(""));
        assert!(!DocumentId::is_valid("5f777777777777777777777"));
        assert!(!DocumentId::is_valid("5f77777777777777777777777"));
        assert!(!DocumentId::is_valid(" 5f7777777777777777777777"));
    }

    #[test]
    fn rejects_multibyte_input_of_matching_byte_length() {
        // 12 two-byte characters: 24 bytes, zero hex digits.
        assert!(!DocumentId::is_valid("éééééééééééé"));
    }

    #[test]
    fn parse_is_case_insensitive_and_renders_lowercase() {
        let upper = DocumentId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        let lower = DocumentId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_error_is_a_validation_error() {
        let err = DocumentId::parse("nope").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }

    #[test]
    fn generated_ids_are_valid_and_distinct() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert!(DocumentId::is_valid(&a.to_string()));
        assert_eq!(DocumentId::parse(&a.to_string()).unwrap(), a);
    }

    #[test]
    fn generated_id_carries_creation_time() {
        let before = Utc::now().timestamp();
        let id = DocumentId::generate();
        let after = Utc::now().timestamp();
        let ts = i64::from(u32::from_be_bytes([id.0[0], id.0[1], id.0[2], id.0[3]]));
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::parse("5f7777777777777777777777").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5f7777777777777777777777\"");
        let back: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<DocumentId>("\"zz\"").is_err());
    }

    proptest! {
        #[test]
        fn any_24_hex_chars_are_accepted(s in "[0-9a-fA-F]{24}") {
            prop_assert!(DocumentId::is_valid(&s));
            prop_assert_eq!(DocumentId::parse(&s).unwrap().to_string(), s.to_ascii_lowercase());
        }

        #[test]
        fn wrong_length_is_rejected(s in "[0-9a-f]{0,23}|[0-9a-f]{25,40}") {
            prop_assert!(!DocumentId::is_valid(&s));
        }

        #[test]
        fn a_single_non_hex_char_is_rejected(
            prefix in "[0-9a-f]{0,23}",
            bad in "[g-zG-Z_ !-]",
        ) {
            let mut s = prefix.clone();
            s.push_str(&bad);
            while s.len() < ID_HEX_LEN {
                s.push('0');
            }
            prop_assert!(!DocumentId::is_valid(&s));
        }
    }
}
