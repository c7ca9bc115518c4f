// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;

use crate::format::{NumberCulture, format_integer};

/// The ten decimal digits, in slot order.
pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// The format used when none is configured, and whose literal characters
/// become the extras when a configured format is malformed.
pub const DEFAULT_FORMAT: &str = "{0:D1}";

/// Formatted to discover which characters a format introduces.
const SENTINEL: i32 = 1_234_567_890;

/// The characters baked into an atlas.
///
/// Digits always occupy slots 0 through 9. Every other character produced by
/// formatting the sentinel value 1234567890 follows in first-seen order, once.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CharacterSet {
    extras: SmallVec<[char; 8]>,
    used_fallback: bool,
}

impl CharacterSet {
    /// Derives the character set of `format`.
    ///
    /// A format that cannot be applied is not an error: the literal characters
    /// of [`DEFAULT_FORMAT`] are used as extras instead.
    pub fn from_format(format: &str, culture: &NumberCulture) -> Self {
        match format_integer(format, SENTINEL, culture) {
            Ok(formatted) => Self {
                extras: distinct(formatted.chars().filter(|ch| !ch.is_ascii_digit())),
                used_fallback: false,
            },
            Err(err) => {
                log::warn!(
                    "format {format:?} cannot be applied ({err}), using the characters of {DEFAULT_FORMAT:?}"
                );
                Self {
                    extras: distinct(DEFAULT_FORMAT.chars()),
                    used_fallback: true,
                }
            }
        }
    }

    /// The non-digit characters, in slot order starting at slot 10.
    pub fn extras(&self) -> &[char] {
        &self.extras
    }

    /// The extras concatenated, as used in cache keys.
    pub fn extras_string(&self) -> String {
        self.extras.iter().collect()
    }

    /// Whether the format was malformed and the fallback extras were used.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    /// Number of lookup table slots: ten digits plus the extras.
    pub fn slot_count(&self) -> usize {
        DIGITS.len() + self.extras.len()
    }

    /// Every character in slot order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        DIGITS.iter().chain(self.extras.iter()).copied()
    }

    /// The slot `ch` is stored in, preferring digit slots.
    pub fn slot_of(&self, ch: char) -> Option<usize> {
        self.chars().position(|c| c == ch)
    }
}

impl Default for CharacterSet {
    fn default() -> Self {
        Self::from_format(DEFAULT_FORMAT, &NumberCulture::invariant())
    }
}

fn distinct(chars: impl Iterator<Item = char>) -> SmallVec<[char; 8]> {
    let mut out = SmallVec::new();
    for ch in chars {
        if !out.contains(&ch) {
            out.push(ch);
        }
    }
    out
}
