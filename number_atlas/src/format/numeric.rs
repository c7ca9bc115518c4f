// Copyright 2026 the Number Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Standard and custom numeric format strings applied to a 32-bit integer.

use core::iter::repeat_n;

use super::{FormatError, NumberCulture};

/// Largest precision a standard format accepts.
const MAX_PRECISION: usize = 99;

pub(super) fn format_number(
    value: i32,
    spec: &str,
    culture: &NumberCulture,
) -> Result<String, FormatError> {
    match parse_standard(spec) {
        Some((letter, precision)) => standard(value, letter, precision, spec, culture),
        None => Ok(custom(value, spec, culture)),
    }
}

/// A standard format is one ASCII letter followed by at most nine digits.
/// Anything else is a custom format.
fn parse_standard(spec: &str) -> Option<(char, Option<usize>)> {
    if spec.is_empty() {
        return Some(('G', None));
    }
    let mut chars = spec.chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    let rest = chars.as_str();
    if rest.len() > 9 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((letter, rest.parse().ok()))
}

fn standard(
    value: i32,
    letter: char,
    precision: Option<usize>,
    spec: &str,
    culture: &NumberCulture,
) -> Result<String, FormatError> {
    if let Some(precision) = precision.filter(|&p| p > MAX_PRECISION) {
        return Err(FormatError::PrecisionOutOfRange { precision });
    }
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let sign = |body: String| {
        if negative {
            format!("{}{body}", culture.negative_sign)
        } else {
            body
        }
    };

    let text = match letter {
        'D' | 'd' => sign(pad_left(&digits, precision.unwrap_or(0))),
        'X' => pad_left(&format!("{value:X}"), precision.unwrap_or(0)),
        'x' => pad_left(&format!("{value:x}"), precision.unwrap_or(0)),
        'N' | 'n' => sign(fixed(&digits, precision.unwrap_or(2), true, culture)),
        'F' | 'f' => sign(fixed(&digits, precision.unwrap_or(2), false, culture)),
        'C' | 'c' => {
            let body = fixed(&digits, precision.unwrap_or(2), true, culture);
            if negative {
                format!("({}{body})", culture.currency_symbol)
            } else {
                format!("{}{body}", culture.currency_symbol)
            }
        }
        'P' | 'p' => {
            let scaled = (u64::from(value.unsigned_abs()) * 100).to_string();
            let body = fixed(&scaled, precision.unwrap_or(2), true, culture);
            sign(format!("{body} {}", culture.percent_symbol))
        }
        'E' | 'e' => {
            let exponent = if letter == 'E' { 'E' } else { 'e' };
            sign(scientific(
                &digits,
                precision.unwrap_or(6),
                exponent,
                3,
                false,
                culture,
            ))
        }
        'G' | 'g' => match precision {
            Some(p) if p > 0 && needs_exponent(&digits, p) => {
                let exponent = if letter == 'G' { 'E' } else { 'e' };
                sign(scientific(&digits, p - 1, exponent, 2, true, culture))
            }
            _ => sign(digits),
        },
        _ => {
            return Err(FormatError::UnknownSpecifier {
                specifier: spec.to_owned(),
            });
        }
    };
    Ok(text)
}

/// Whether `digits` rounded to `significant` digits has an exponent of at
/// least `significant`.
fn needs_exponent(digits: &str, significant: usize) -> bool {
    let (_, carried) = round_significant(digits, significant);
    digits.len() - 1 + usize::from(carried) >= significant
}

fn fixed(digits: &str, decimals: usize, grouped: bool, culture: &NumberCulture) -> String {
    let mut out = if grouped {
        group(digits, &culture.group_separator)
    } else {
        digits.to_owned()
    };
    if decimals > 0 {
        out.push_str(&culture.decimal_separator);
        out.extend(repeat_n('0', decimals));
    }
    out
}

fn scientific(
    digits: &str,
    decimals: usize,
    exponent_char: char,
    min_exponent_digits: usize,
    trim_zeros: bool,
    culture: &NumberCulture,
) -> String {
    let (mantissa, carried) = round_significant(digits, decimals + 1);
    let exponent = digits.len() - 1 + usize::from(carried);
    let (lead, rest) = mantissa.split_at(1);
    let rest = if trim_zeros {
        rest.trim_end_matches('0')
    } else {
        rest
    };
    let mut out = String::from(lead);
    if !rest.is_empty() {
        out.push_str(&culture.decimal_separator);
        out.push_str(rest);
    }
    out.push(exponent_char);
    out.push('+');
    out.push_str(&pad_left(&exponent.to_string(), min_exponent_digits));
    out
}

/// Rounds a digit string half away from zero to `keep` significant digits.
///
/// Returns the digits and whether rounding carried into a new leading digit.
fn round_significant(digits: &str, keep: usize) -> (String, bool) {
    if digits.len() <= keep {
        let mut out = digits.to_owned();
        out.extend(repeat_n('0', keep - digits.len()));
        return (out, false);
    }
    let (head, tail) = digits.split_at(keep);
    if !tail.as_bytes().first().is_some_and(|&b| b >= b'5') {
        return (head.to_owned(), false);
    }
    let (mut rounded, carried) = increment(head);
    if carried {
        rounded.insert(0, '1');
        rounded.pop();
    }
    (rounded, carried)
}

/// Adds one to a decimal digit string. The flag reports a carry out of the
/// most significant digit.
fn increment(digits: &str) -> (String, bool) {
    let mut chars: Vec<char> = digits.chars().collect();
    for ch in chars.iter_mut().rev() {
        if *ch == '9' {
            *ch = '0';
        } else {
            *ch = char::from_digit(ch.to_digit(10).unwrap_or(0) + 1, 10).unwrap_or('0');
            return (chars.into_iter().collect(), false);
        }
    }
    (chars.into_iter().collect(), true)
}

fn group(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn pad_left(digits: &str, width: usize) -> String {
    let mut out = String::with_capacity(width.max(digits.len()));
    out.extend(repeat_n('0', width.saturating_sub(digits.len())));
    out.push_str(digits);
    out
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Token {
    Zero,
    Hash,
    Point,
    Comma,
    Percent,
    PerMille,
    Literal(char),
}

impl Token {
    fn is_digit(self) -> bool {
        matches!(self, Self::Zero | Self::Hash)
    }
}

fn custom(value: i32, spec: &str, culture: &NumberCulture) -> String {
    let sections = split_sections(spec);
    let first = sections.first().copied().unwrap_or("");
    let pick = |index: usize| sections.get(index).copied().filter(|s| !s.is_empty());

    // A section used for negative values supplies its own sign.
    let (section, signed) = if value < 0 {
        match pick(1) {
            Some(section) => (section, false),
            None => (first, true),
        }
    } else if value == 0 {
        (pick(2).unwrap_or(first), false)
    } else {
        (first, false)
    };

    render_section(
        &tokenize(section),
        value.unsigned_abs(),
        value < 0 && signed,
        culture,
    )
}

fn split_sections(spec: &str) -> Vec<&str> {
    let mut sections = Vec::with_capacity(3);
    let mut start = 0;
    let mut quote = None;
    let mut escaped = false;
    for (i, ch) in spec.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(ch),
            (None, ';') => {
                sections.push(&spec[start..i]);
                start = i + 1;
            }
            (None, _) => {}
        }
    }
    sections.push(&spec[start..]);
    sections.truncate(3);
    sections
}

fn tokenize(section: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(section.len());
    let mut chars = section.chars();
    while let Some(ch) = chars.next() {
        let token = match ch {
            '0' => Token::Zero,
            '#' => Token::Hash,
            '.' => Token::Point,
            ',' => Token::Comma,
            '%' => Token::Percent,
            '\u{2030}' => Token::PerMille,
            '\\' => match chars.next() {
                Some(escaped) => Token::Literal(escaped),
                None => continue,
            },
            '\'' | '"' => {
                for quoted in chars.by_ref() {
                    if quoted == ch {
                        break;
                    }
                    tokens.push(Token::Literal(quoted));
                }
                continue;
            }
            _ => Token::Literal(ch),
        };
        tokens.push(token);
    }
    tokens
}

fn render_section(
    tokens: &[Token],
    magnitude: u32,
    negative: bool,
    culture: &NumberCulture,
) -> String {
    let point = tokens.iter().position(|&t| t == Token::Point);
    let int_tokens = &tokens[..point.unwrap_or(tokens.len())];
    let frac_tokens = point.map_or(&[][..], |p| &tokens[p + 1..]);

    let int_placeholders = int_tokens.iter().filter(|t| t.is_digit()).count();
    let min_int = int_tokens
        .iter()
        .filter(|t| t.is_digit())
        .position(|&t| t == Token::Zero)
        .map_or(0, |first_zero| int_placeholders - first_zero);
    let first_digit = int_tokens.iter().position(|t| t.is_digit());
    let last_digit = int_tokens.iter().rposition(|t| t.is_digit());

    // Commas right after the last integer placeholder divide by a thousand
    // each. Commas between placeholders turn on digit grouping.
    let scaling_commas = last_digit.map_or(0, |last| {
        int_tokens[last + 1..]
            .iter()
            .take_while(|&&t| t == Token::Comma)
            .count()
    });
    let grouping = match (first_digit, last_digit) {
        (Some(first), Some(last)) => int_tokens[first..last].contains(&Token::Comma),
        _ => false,
    };

    let frac_placeholders = frac_tokens.iter().filter(|t| t.is_digit()).count();
    let min_frac = frac_tokens
        .iter()
        .filter(|t| t.is_digit())
        .enumerate()
        .filter(|&(_, &t)| t == Token::Zero)
        .last()
        .map_or(0, |(last_zero, _)| last_zero + 1);

    let percents = tokens.iter().filter(|&&t| t == Token::Percent).count();
    let per_milles = tokens.iter().filter(|&&t| t == Token::PerMille).count();
    let multiply_zeros = 2 * percents + 3 * per_milles;
    let divide_digits = 3 * scaling_commas;

    let digits = magnitude.to_string();
    let (mut int_part, mut frac_part) = if multiply_zeros >= divide_digits {
        let mut int_part = digits;
        int_part.extend(repeat_n('0', multiply_zeros - divide_digits));
        (int_part, String::new())
    } else {
        let shift = divide_digits - multiply_zeros;
        if shift >= digits.len() {
            let mut frac_part: String = repeat_n('0', shift - digits.len()).collect();
            frac_part.push_str(&digits);
            (String::new(), frac_part)
        } else {
            let (int_part, frac_part) = digits.split_at(digits.len() - shift);
            (int_part.to_owned(), frac_part.to_owned())
        }
    };

    if frac_part.len() > frac_placeholders {
        let round_up = frac_part
            .as_bytes()
            .get(frac_placeholders)
            .is_some_and(|&b| b >= b'5');
        frac_part.truncate(frac_placeholders);
        if round_up {
            let (mut sum, carried) = increment(&format!("{int_part}{frac_part}"));
            if carried {
                sum.insert(0, '1');
            }
            let split = sum.len() - frac_placeholders;
            frac_part = sum.split_off(split);
            int_part = sum;
        }
    }

    let trimmed = int_part.trim_start_matches('0');
    let int_digits = pad_left(trimmed, min_int);
    while frac_part.len() > min_frac && frac_part.ends_with('0') {
        frac_part.pop();
    }
    let missing = min_frac.saturating_sub(frac_part.len());
    frac_part.extend(repeat_n('0', missing));

    let is_zero = int_digits.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
    let mut out = String::new();
    if negative && !is_zero {
        out.push_str(&culture.negative_sign);
    }

    let int_digits: Vec<char> = int_digits.chars().collect();
    let overflow = int_digits.len().saturating_sub(int_placeholders);
    let push_digit = |out: &mut String, index: usize| {
        out.push(int_digits[index]);
        let place = int_digits.len() - 1 - index;
        if grouping && place > 0 && place.is_multiple_of(3) {
            out.push_str(&culture.group_separator);
        }
    };

    let mut int_seen = 0;
    let mut frac_digits = frac_part.chars();
    for (index, &token) in tokens.iter().enumerate() {
        let in_int = point.is_none_or(|p| index < p);
        match token {
            Token::Zero | Token::Hash if in_int => {
                if int_seen == 0 {
                    for leading in 0..overflow {
                        push_digit(&mut out, leading);
                    }
                }
                // Place value of this placeholder, counted from the units.
                let place = int_placeholders - 1 - int_seen;
                if place < int_digits.len() {
                    push_digit(&mut out, int_digits.len() - 1 - place);
                }
                int_seen += 1;
            }
            Token::Zero | Token::Hash => out.extend(frac_digits.next()),
            Token::Point if Some(index) == point && !frac_part.is_empty() => {
                out.push_str(&culture.decimal_separator);
            }
            Token::Point | Token::Comma => {}
            Token::Percent => out.push_str(&culture.percent_symbol),
            Token::PerMille => out.push_str(&culture.per_mille_symbol),
            Token::Literal(ch) => out.push(ch),
        }
    }
    out
}
