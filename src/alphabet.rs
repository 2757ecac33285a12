//! # Alphabet — Character-Class Selector → Ordered Byte Alphabet
//!
//! Translates a selector string like `"aAn"` into the ordered, duplicate-free
//! byte alphabet the brute-force engine enumerates over. Selector tokens are
//! processed left to right:
//!
//! | Token | Appends |
//! |-------|---------|
//! | `a`   | `abcdefghijklmnopqrstuvwxyz` |
//! | `A`   | `ABCDEFGHIJKLMNOPQRSTUVWXYZ` |
//! | `n`   | `0123456789` |
//! | `s`   | `` !"#$%&'()*+,-./:;<=>?@[\]^_`{\|}~ `` |
//! | `x`   | resets to `a`+`A`+`n`+`s` and stops consuming further tokens |
//!
//! Repeated tokens contribute nothing (byte-level dedup), `x` anywhere
//! behaves exactly like `x` alone, and any other character invalidates the
//! whole selector. The four classes together hold 91 distinct bytes, so the
//! alphabet is always small and is built once per run.

use thiserror::Error;

/// Lowercase class, token `a`.
pub const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
/// Uppercase class, token `A`.
pub const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Digit class, token `n`.
pub const DIGITS: &[u8] = b"0123456789";
/// Printable-symbol class, token `s`.
pub const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("empty character-class selector")]
    EmptySelector,
    #[error("invalid character class {0:?} in selector (valid classes: a A n s x)")]
    InvalidClass(char),
}

/// An ordered sequence of distinct bytes candidates are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    bytes: Vec<u8>,
}

impl Alphabet {
    /// Build an alphabet from a selector string, per the table above.
    pub fn build(selector: &str) -> Result<Self, AlphabetError> {
        if selector.is_empty() {
            return Err(AlphabetError::EmptySelector);
        }
        let mut bytes = Vec::with_capacity(91);
        let mut seen = [false; 256];
        for token in selector.chars() {
            match token {
                'a' => append_class(&mut bytes, &mut seen, LOWER),
                'A' => append_class(&mut bytes, &mut seen, UPPER),
                'n' => append_class(&mut bytes, &mut seen, DIGITS),
                's' => append_class(&mut bytes, &mut seen, SYMBOLS),
                'x' => {
                    // Reset and stop: `x` overrides everything around it.
                    bytes.clear();
                    seen = [false; 256];
                    append_class(&mut bytes, &mut seen, LOWER);
                    append_class(&mut bytes, &mut seen, UPPER);
                    append_class(&mut bytes, &mut seen, DIGITS);
                    append_class(&mut bytes, &mut seen, SYMBOLS);
                    break;
                }
                other => return Err(AlphabetError::InvalidClass(other)),
            }
        }
        Ok(Alphabet { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn append_class(bytes: &mut Vec<u8>, seen: &mut [bool; 256], class: &[u8]) {
    for &b in class {
        if !seen[b as usize] {
            seen[b as usize] = true;
            bytes.push(b);
        }
    }
}
