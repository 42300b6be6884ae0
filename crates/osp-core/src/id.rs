//! [`ObjectId`] — the opaque identifier carried by surveys, questions,
//! responses and respondents.
//!
//! Twelve bytes rendered as 24 lowercase hex characters: a 4-byte big-endian
//! Unix timestamp, 5 bytes of per-process randomness and a 3-byte big-endian
//! counter seeded at random. The all-zero value is reserved as the "unset"
//! marker and is never produced by [`ObjectId::new`].

use std::{
  fmt,
  str::FromStr,
  sync::{
    OnceLock,
    atomic::{AtomicU32, Ordering},
  },
};

use chrono::Utc;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Error;

const COUNTER_MASK: u32 = 0x00ff_ffff;

/// A 12-byte identifier. `Default` yields the zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId([u8; 12]);

struct ProcessSeed {
  unique:  [u8; 5],
  counter: AtomicU32,
}

fn process_seed() -> &'static ProcessSeed {
  static SEED: OnceLock<ProcessSeed> = OnceLock::new();
  SEED.get_or_init(|| {
    let mut unique = [0u8; 5];
    OsRng.fill_bytes(&mut unique);
    ProcessSeed {
      unique,
      counter: AtomicU32::new(OsRng.next_u32() & COUNTER_MASK),
    }
  })
}

impl ObjectId {
  /// The reserved "unset" identifier.
  pub const ZERO: Self = Self([0; 12]);

  /// Generate a fresh identifier.
  pub fn new() -> Self {
    let seed = process_seed();
    let secs = Utc::now().timestamp() as u32;
    let count = seed.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..9].copy_from_slice(&seed.unique);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
    Self(bytes)
  }

  pub fn is_zero(&self) -> bool { *self == Self::ZERO }

  /// The 24-character lowercase hex form.
  pub fn to_hex(&self) -> String { hex::encode(self.0) }

  /// Parse the 24-character hex form (either case).
  pub fn parse_str(s: &str) -> crate::Result<Self> {
    if s.len() != 24 {
      return Err(Error::InvalidObjectId(s.to_owned()));
    }
    let mut bytes = [0u8; 12];
    hex::decode_to_slice(s, &mut bytes)
      .map_err(|_| Error::InvalidObjectId(s.to_owned()))?;
    Ok(Self(bytes))
  }
}

impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl FromStr for ObjectId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse_str(s) }
}

impl Serialize for ObjectId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ObjectId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Self::parse_str(&s).map_err(de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn new_ids_are_unique_and_non_zero() {
    let ids: HashSet<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
    assert_eq!(ids.len(), 1000);
    assert!(ids.iter().all(|id| !id.is_zero()));
  }

  #[test]
  fn hex_form_is_24_lowercase_chars() {
    let hex = ObjectId::new().to_hex();
    assert_eq!(hex.len(), 24);
    assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
  }

  #[test]
  fn parse_accepts_uppercase_hex() {
    let id = ObjectId::new();
    let parsed: ObjectId = id.to_hex().to_uppercase().parse().unwrap();
    assert_eq!(parsed, id);
  }

  #[test]
  fn parse_rejects_malformed_input() {
    for bad in ["", "abc", "zzzzzzzzzzzzzzzzzzzzzzzz", "0123456789abcdef012345678"] {
      assert!(ObjectId::parse_str(bad).is_err(), "accepted {bad:?}");
    }
  }

  #[test]
  fn leading_bytes_hold_creation_time() {
    let before = Utc::now().timestamp();
    let b = ObjectId::new().0;
    let secs = i64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
    assert!((before..=before + 5).contains(&secs), "timestamp {secs} vs {before}");
  }

  #[test]
  fn serde_uses_hex_string() {
    let id = ObjectId([0xab; 12]);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"abababababababababababab\"");
    let back: ObjectId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
    assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
  }
}
