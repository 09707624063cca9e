//! Text concerns for generated output: newline detection and
//! normalization, and encoding/decoding of output files.
//!
//! Everything here is pure so the generation engine's filesystem phase can
//! stay thin.

use std::borrow::Cow;

/// Name used when a generation request does not specify an encoding.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// A newline override for generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    Cr,
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Cr => "\r",
            Newline::CrLf => "\r\n",
        }
    }
}

/// The newline sequence conventionally used on the build platform.
pub fn platform_newline() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

/// The first line terminator appearing in `text`, or `None` when the text
/// has no line break at all. A `\r` immediately followed by `\n` counts as
/// one `\r\n` terminator.
pub fn detect_newline(text: &str) -> Option<&'static str> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\n' => return Some("\n"),
            b'\r' => {
                return if bytes.get(i + 1) == Some(&b'\n') {
                    Some("\r\n")
                } else {
                    Some("\r")
                };
            }
            _ => {}
        }
    }
    None
}

/// Replace every line break (`\r\n`, `\r`, or `\n`) in `text` with
/// `newline`.
pub fn normalize_newlines(text: &str, newline: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(newline);
            }
            '\n' => out.push_str(newline),
            other => out.push(other),
        }
    }
    out
}

/// A text encoding for reading and writing output files.
///
/// UTF-8, ASCII, and the UTF-16 variants are handled directly: the WHATWG
/// label registry behind `encoding_rs` folds ASCII into windows-1252 and
/// refuses to produce UTF-16 output, neither of which is wanted here.
/// Every other label is resolved through `encoding_rs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
    /// Little-endian UTF-16; `bom` is written for the plain "utf-16" label.
    Utf16Le { bom: bool },
    Utf16Be,
    Legacy(&'static encoding_rs::Encoding),
}

/// A character the chosen encoding cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unencodable {
    pub character: char,
    /// Character index within the text being encoded.
    pub position: usize,
}

impl TextEncoding {
    /// Resolve an encoding name. Names are matched the way codec registries
    /// usually do: case-insensitively, ignoring `-` and `_`.
    pub fn resolve(name: &str) -> Option<TextEncoding> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "utf8" => Some(TextEncoding::Utf8),
            "ascii" | "usascii" => Some(TextEncoding::Ascii),
            "utf16" => Some(TextEncoding::Utf16Le { bom: true }),
            "utf16le" => Some(TextEncoding::Utf16Le { bom: false }),
            "utf16be" => Some(TextEncoding::Utf16Be),
            _ => encoding_rs::Encoding::for_label(name.as_bytes()).map(TextEncoding::Legacy),
        }
    }

    /// Encode `text`, failing on the first unrepresentable character.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, Unencodable> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Ascii => {
                if let Some((position, character)) =
                    text.chars().enumerate().find(|(_, c)| !c.is_ascii())
                {
                    return Err(Unencodable {
                        character,
                        position,
                    });
                }
                Ok(text.as_bytes().to_vec())
            }
            TextEncoding::Utf16Le { bom } => {
                let mut out = Vec::with_capacity(text.len() * 2 + 2);
                if bom {
                    out.extend_from_slice(&[0xFF, 0xFE]);
                }
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                Ok(out)
            }
            TextEncoding::Utf16Be => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                Ok(out)
            }
            TextEncoding::Legacy(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                if !had_errors {
                    return Ok(bytes.into_owned());
                }
                // Re-encode character by character to locate the offender.
                let mut buf = [0u8; 4];
                for (position, character) in text.chars().enumerate() {
                    let (_, _, bad) = encoding.encode(character.encode_utf8(&mut buf));
                    if bad {
                        return Err(Unencodable {
                            character,
                            position,
                        });
                    }
                }
                unreachable!("encoder reported errors but every character encoded");
            }
        }
    }

    /// Decode `bytes` strictly, returning a description of the malformed
    /// input on failure.
    pub fn decode(self, bytes: &[u8]) -> Result<String, String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| e.to_string()),
            TextEncoding::Ascii => {
                if let Some((i, &b)) = bytes.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
                    return Err(format!("byte 0x{:02x} in position {} is not ASCII", b, i));
                }
                // All-ASCII input is valid UTF-8.
                Ok(std::str::from_utf8(bytes).unwrap().to_string())
            }
            TextEncoding::Utf16Le { .. } => {
                let bytes = strip_prefix_bom(bytes, &[0xFF, 0xFE]);
                decode_utf16_units(bytes, u16::from_le_bytes)
            }
            TextEncoding::Utf16Be => {
                let bytes = strip_prefix_bom(bytes, &[0xFE, 0xFF]);
                decode_utf16_units(bytes, u16::from_be_bytes)
            }
            TextEncoding::Legacy(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned)
                .ok_or_else(|| "malformed byte sequence".to_string()),
        }
    }
}

fn strip_prefix_bom<'a>(bytes: &'a [u8], bom: &[u8]) -> &'a [u8] {
    bytes.strip_prefix(bom).unwrap_or(bytes)
}

fn decode_utf16_units(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!("truncated UTF-16 data of {} bytes", bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| e.to_string())
}
