//! # Unicode Escape Decoding
//!
//! Turns text containing backslash escapes (`\u00e9`, `\x41`, `\n`, ...)
//! into the characters they denote. Test fixtures use this to spell
//! non-ASCII place names and expected response strings in plain ASCII.
//!
//! Recognised escapes:
//!
//! | Escape        | Meaning                                  |
//! |---------------|------------------------------------------|
//! | `\\` `\'` `\"` | the character itself                    |
//! | `\a` `\b` `\f` `\n` `\r` `\t` `\v` | control characters  |
//! | `\<newline>`  | removed (line continuation)              |
//! | `\o` .. `\ooo` | octal code point, one to three digits   |
//! | `\xHH`        | exactly two hex digits                   |
//! | `\uHHHH`      | exactly four hex digits                  |
//! | `\UHHHHHHHH`  | exactly eight hex digits                 |
//! | `\N{NAME}`    | character by Unicode name (`\N{BULLET}`) |
//!
//! Any other escaped character is kept verbatim, backslash included.
//! Characters outside escapes pass through unchanged.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Malformed escape sequence. Offsets are byte offsets of the backslash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    #[error("truncated \\{escape} escape at byte {offset}: expected {expected} hex digits")]
    Truncated {
        offset: usize,
        escape: char,
        expected: usize,
    },

    #[error("escape \\{escape} at byte {offset} encodes U+{value:X}, which is not a Unicode scalar value")]
    InvalidCodePoint {
        offset: usize,
        escape: char,
        value: u32,
    },

    #[error("\\ at end of string (byte {offset})")]
    TrailingBackslash { offset: usize },

    #[error("malformed \\N character escape at byte {offset}")]
    MalformedName { offset: usize },

    #[error("unknown Unicode character name '{name}' at byte {offset}")]
    UnknownName { offset: usize, name: String },
}

/// Decode every backslash escape in `input`.
///
/// # Errors
///
/// Returns an `EscapeError` for truncated hex escapes, code points that are
/// not Unicode scalar values (surrogates, anything above U+10FFFF), a lone
/// trailing backslash, a `\N` escape without a braced name, or a name the
/// Unicode character database does not know.
pub fn decode_unicode_escapes(input: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escape)) = chars.next() else {
            return Err(EscapeError::TrailingBackslash { offset });
        };
        match escape {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(escape),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|&(_, d)| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(scalar(value, offset, escape)?);
            }
            'x' => out.push(scalar(read_hex(&mut chars, 2, offset, escape)?, offset, escape)?),
            'u' => out.push(scalar(read_hex(&mut chars, 4, offset, escape)?, offset, escape)?),
            'U' => out.push(scalar(read_hex(&mut chars, 8, offset, escape)?, offset, escape)?),
            'N' => out.push(read_name(&mut chars, offset)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn read_hex(
    chars: &mut Peekable<CharIndices<'_>>,
    digits: usize,
    offset: usize,
    escape: char,
) -> Result<u32, EscapeError> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let digit = chars
            .peek()
            .and_then(|&(_, d)| d.to_digit(16))
            .ok_or(EscapeError::Truncated {
                offset,
                escape,
                expected: digits,
            })?;
        value = value * 16 + digit;
        chars.next();
    }
    Ok(value)
}

fn read_name(chars: &mut Peekable<CharIndices<'_>>, offset: usize) -> Result<char, EscapeError> {
    if chars.next_if(|&(_, c)| c == '{').is_none() {
        return Err(EscapeError::MalformedName { offset });
    }
    let mut name = String::new();
    loop {
        match chars.next() {
            Some((_, '}')) if !name.is_empty() => break,
            Some((_, '}')) | None => return Err(EscapeError::MalformedName { offset }),
            Some((_, c)) => name.push(c),
        }
    }
    unicode_names2::character(&name).ok_or(EscapeError::UnknownName { offset, name })
}

fn scalar(value: u32, offset: usize, escape: char) -> Result<char, EscapeError> {
    char::from_u32(value).ok_or(EscapeError::InvalidCodePoint {
        offset,
        escape,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unicode_escapes() {
        assert_eq!(decode_unicode_escapes(r"caf\u00e9").unwrap(), "café");
        assert_eq!(decode_unicode_escapes(r"\u4e2d\u6587").unwrap(), "中文");
        assert_eq!(decode_unicode_escapes(r"\U0001F5FA").unwrap(), "\u{1F5FA}");
    }

    #[test]
    fn byte_and_octal_escapes() {
        assert_eq!(decode_unicode_escapes(r"\x41\x62").unwrap(), "Ab");
        assert_eq!(decode_unicode_escapes(r"\101\0").unwrap(), "A\0");
        // Octal stops at the first non-octal digit.
        assert_eq!(decode_unicode_escapes(r"\18").unwrap(), "\u{1}8");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(
            decode_unicode_escapes(r#"a\tb\nc\\d\'e\"f"#).unwrap(),
            "a\tb\nc\\d'e\"f"
        );
        assert_eq!(decode_unicode_escapes(r"\a\b\f\v\r").unwrap(), "\u{7}\u{8}\u{c}\u{b}\r");
    }

    #[test]
    fn line_continuation_is_removed() {
        assert_eq!(decode_unicode_escapes("Heidel\\\nberg").unwrap(), "Heidelberg");
    }

    #[test]
    fn unknown_escapes_are_kept() {
        assert_eq!(decode_unicode_escapes(r"\q\z").unwrap(), r"\q\z");
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(decode_unicode_escapes("Köln \\u00fc").unwrap(), "Köln ü");
    }

    #[test]
    fn truncated_escape() {
        assert_eq!(
            decode_unicode_escapes(r"ab\u12").unwrap_err(),
            EscapeError::Truncated {
                offset: 2,
                escape: 'u',
                expected: 4
            }
        );
        assert!(matches!(
            decode_unicode_escapes(r"\xZZ").unwrap_err(),
            EscapeError::Truncated { escape: 'x', .. }
        ));
    }

    #[test]
    fn surrogates_are_rejected() {
        assert_eq!(
            decode_unicode_escapes(r"\ud800").unwrap_err(),
            EscapeError::InvalidCodePoint {
                offset: 0,
                escape: 'u',
                value: 0xD800
            }
        );
        assert!(matches!(
            decode_unicode_escapes(r"\U00110000").unwrap_err(),
            EscapeError::InvalidCodePoint { value: 0x110000, .. }
        ));
    }

    #[test]
    fn trailing_backslash() {
        assert_eq!(
            decode_unicode_escapes("abc\\").unwrap_err(),
            EscapeError::TrailingBackslash { offset: 3 }
        );
    }

    #[test]
    fn named_escapes() {
        assert_eq!(decode_unicode_escapes(r"\N{BULLET}").unwrap(), "\u{2022}");
        assert_eq!(
            decode_unicode_escapes(r"Caf\N{LATIN SMALL LETTER E WITH ACUTE}").unwrap(),
            "Caf\u{e9}"
        );
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = decode_unicode_escapes(r"ab\N{NOT A REAL CHARACTER}").unwrap_err();
        assert_eq!(
            err,
            EscapeError::UnknownName {
                offset: 2,
                name: "NOT A REAL CHARACTER".to_string()
            }
        );
        assert!(err.to_string().contains("NOT A REAL CHARACTER"));
    }

    #[test]
    fn malformed_named_escapes() {
        for input in [r"\N", r"\NBULLET", r"\N{BULLET", r"\N{}"] {
            assert_eq!(
                decode_unicode_escapes(input).unwrap_err(),
                EscapeError::MalformedName { offset: 0 },
                "{input}"
            );
        }
    }

    #[test]
    fn error_messages_name_the_escape() {
        let err = decode_unicode_escapes(r"\u12").unwrap_err();
        assert!(err.to_string().starts_with(r"truncated \u escape"));
    }

    proptest! {
        /// Text without backslashes is returned unchanged.
        #[test]
        fn plain_text_is_identity(s in "[^\\\\]*") {
            prop_assert_eq!(decode_unicode_escapes(&s).unwrap(), s);
        }

        /// Every scalar value survives a `\U` escape.
        #[test]
        fn long_escape_decodes_any_char(c in any::<char>()) {
            let escaped = format!("\\U{:08x}", c as u32);
            prop_assert_eq!(decode_unicode_escapes(&escaped).unwrap(), c.to_string());
        }
    }
}
