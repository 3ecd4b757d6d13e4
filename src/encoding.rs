//! Single-byte text encoding used for the whole document.
//!
//! Documents are written in WinAnsi (Windows-1252): ASCII and Latin-1 map to themselves and a
//! handful of typographic characters map into the `0x80..=0x9F` block. Both font resources
//! declare `/WinAnsiEncoding`, so the bytes written here are the glyphs a reader will show.
//! Characters outside the repertoire are replaced by `?`, one byte per character, which keeps
//! byte length equal to character count for every input.

/// Byte written for characters that WinAnsi cannot represent.
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Result of encoding text to WinAnsi.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinAnsiEncoded {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Number of characters that were replaced by [`REPLACEMENT_BYTE`].
    pub replaced: usize,
}

/// Maps a character to its WinAnsi byte, if it has one.
pub fn winansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{0000}'..='\u{007F}' => ch as u8,
        '\u{00A0}'..='\u{00FF}' => ch as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Encodes `text` to WinAnsi and reports how many characters were lossy.
pub fn encode_winansi(text: &str) -> WinAnsiEncoded {
    let mut encoded = WinAnsiEncoded {
        bytes: Vec::with_capacity(text.len()),
        replaced: 0,
    };
    for ch in text.chars() {
        match winansi_byte(ch) {
            Some(byte) => encoded.bytes.push(byte),
            None => {
                encoded.bytes.push(REPLACEMENT_BYTE);
                encoded.replaced += 1;
            }
        }
    }
    encoded
}
