//! Public survey tokens.
//!
//! A token is the short, shareable handle respondents use to open a survey.
//! Uniqueness is not guaranteed here; the store rejects duplicates and the
//! caller regenerates.

use rand_core::{OsRng, RngCore};

/// Number of characters in a token.
pub const TOKEN_LEN: usize = 5;

const ALPHABET: &[u8; 52] =
  b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

// Largest multiple of 52 that fits in a byte; bytes at or above it are
// discarded so every letter stays equally likely.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Generate a fresh token from the OS random source.
pub fn generate() -> String { generate_with(&mut OsRng) }

/// Generate a token from an arbitrary random source.
pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> String {
  let mut token = String::with_capacity(TOKEN_LEN);
  let mut buf = [0u8; 16];
  while token.len() < TOKEN_LEN {
    rng.fill_bytes(&mut buf);
    for &byte in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
      if token.len() == TOKEN_LEN {
        break;
      }
      token.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
    }
  }
  token
}

/// Whether `s` has the shape of a token.
pub fn is_well_formed(s: &str) -> bool {
  s.len() == TOKEN_LEN && s.bytes().all(|b| b.is_ascii_alphabetic())
}
