// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite format strings with a single integer argument.
//!
//! A template is literal text with `{{` and `}}` escapes and any number of
//! format items of the form `{0[,alignment][:format]}`. The format part is
//! either a standard numeric format (`D`, `N`, `F`, `G`, `X`, `C`, `P`, `E`,
//! optionally followed by a precision) or a custom numeric format built from
//! `0`, `#`, `.`, `,`, `%`, `‰`, quoted literals and up to three `;`
//! sections.
//!
//! ```
//! use number_atlas::format::{NumberCulture, format_integer};
//!
//! let culture = NumberCulture::invariant();
//! assert_eq!(format_integer("${0:N0}", 1234567890, &culture).unwrap(), "$1,234,567,890");
//! assert_eq!(format_integer("{0:(000) 000-0000}", 1234567890, &culture).unwrap(), "(123) 456-7890");
//! assert!(format_integer("{0:Q}", 1, &culture).is_err());
//! ```

mod numeric;

use core::iter::Peekable;
use core::str::CharIndices;

/// Symbols used when formatting numbers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NumberCulture {
    /// Inserted between groups of integer digits.
    pub group_separator: String,
    /// Separates integer and fractional digits.
    pub decimal_separator: String,
    /// Prefix of negative numbers.
    pub negative_sign: String,
    /// Used by the `C` format.
    pub currency_symbol: String,
    /// Used by the `P` format and the `%` custom specifier.
    pub percent_symbol: String,
    /// Used by the `‰` custom specifier.
    pub per_mille_symbol: String,
}

impl NumberCulture {
    /// The culture-neutral symbol set.
    pub fn invariant() -> Self {
        Self {
            group_separator: ",".into(),
            decimal_separator: ".".into(),
            negative_sign: "-".into(),
            currency_symbol: "\u{a4}".into(),
            percent_symbol: "%".into(),
            per_mille_symbol: "\u{2030}".into(),
        }
    }
}

impl Default for NumberCulture {
    fn default() -> Self {
        Self::invariant()
    }
}

/// Why a format template could not be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    /// A `{` or `}` at this byte offset is neither escaped nor part of an item.
    UnmatchedBrace {
        /// Byte offset into the template.
        position: usize,
    },
    /// The item starting at this byte offset is malformed.
    InvalidItem {
        /// Byte offset into the template.
        position: usize,
    },
    /// An item refers to an argument other than `0`.
    ArgumentOutOfRange {
        /// The argument index that was referenced.
        index: usize,
    },
    /// A standard format letter that has no meaning for integers.
    UnknownSpecifier {
        /// The offending format string.
        specifier: String,
    },
    /// A standard format precision above 99.
    PrecisionOutOfRange {
        /// The requested precision.
        precision: usize,
    },
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnmatchedBrace { position } => write!(f, "unmatched brace at {position}"),
            Self::InvalidItem { position } => write!(f, "malformed format item at {position}"),
            Self::ArgumentOutOfRange { index } => {
                write!(f, "argument {index} referenced, only argument 0 exists")
            }
            Self::UnknownSpecifier { specifier } => {
                write!(f, "unknown numeric format specifier `{specifier}`")
            }
            Self::PrecisionOutOfRange { precision } => {
                write!(f, "format precision {precision} is out of range")
            }
        }
    }
}

impl core::error::Error for FormatError {}

/// Largest index or alignment accepted in a format item.
const ITEM_NUMBER_LIMIT: usize = 1_000_000;

/// Formats `value` into every item of `template`.
pub fn format_integer(
    template: &str,
    value: i32,
    culture: &NumberCulture,
) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.char_indices().peekable();
    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' => {
                if chars.next_if(|&(_, c)| c == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let item = parse_item(&mut chars, position)?;
                if item.index != 0 {
                    return Err(FormatError::ArgumentOutOfRange { index: item.index });
                }
                let text = numeric::format_number(value, &item.format, culture)?;
                push_aligned(&mut out, &text, item.alignment);
            }
            '}' => {
                if chars.next_if(|&(_, c)| c == '}').is_some() {
                    out.push('}');
                    continue;
                }
                return Err(FormatError::UnmatchedBrace { position });
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}

struct FormatItem {
    index: usize,
    alignment: i64,
    format: String,
}

fn parse_item(
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
) -> Result<FormatItem, FormatError> {
    let invalid = || FormatError::InvalidItem { position: start };

    let index = parse_number(chars).ok_or_else(invalid)?;
    skip_spaces(chars);

    let mut alignment = 0;
    if chars.next_if(|&(_, c)| c == ',').is_some() {
        skip_spaces(chars);
        let negative = chars.next_if(|&(_, c)| c == '-').is_some();
        let width = parse_number(chars).ok_or_else(invalid)?;
        let width = i64::try_from(width).map_err(|_| invalid())?;
        alignment = if negative { -width } else { width };
        skip_spaces(chars);
    }

    let mut format = String::new();
    match chars.next() {
        Some((_, '}')) => {}
        Some((_, ':')) => loop {
            match chars.next() {
                Some((_, '}')) => {
                    if chars.next_if(|&(_, c)| c == '}').is_some() {
                        format.push('}');
                    } else {
                        break;
                    }
                }
                Some((_, '{')) => {
                    if chars.next_if(|&(_, c)| c == '{').is_some() {
                        format.push('{');
                    } else {
                        return Err(invalid());
                    }
                }
                Some((_, c)) => format.push(c),
                None => return Err(invalid()),
            }
        },
        _ => return Err(invalid()),
    }

    Ok(FormatItem {
        index,
        alignment,
        format,
    })
}

fn parse_number(chars: &mut Peekable<CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        let digit = c.to_digit(10)? as usize;
        let next = value.unwrap_or(0) * 10 + digit;
        if next >= ITEM_NUMBER_LIMIT {
            return None;
        }
        value = Some(next);
    }
    value
}

fn skip_spaces(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|&(_, c)| c == ' ').is_some() {}
}

fn push_aligned(out: &mut String, text: &str, alignment: i64) {
    let width = usize::try_from(alignment.unsigned_abs()).unwrap_or(usize::MAX);
    let padding = width.saturating_sub(text.chars().count());
    if alignment > 0 {
        out.extend(core::iter::repeat_n(' ', padding));
        out.push_str(text);
    } else {
        out.push_str(text);
        out.extend(core::iter::repeat_n(' ', padding));
    }
}
