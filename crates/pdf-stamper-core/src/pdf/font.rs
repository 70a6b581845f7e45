//! Standard Type1 fonts for stamp text.
//!
//! The Latin faces of the PDF standard 14 fonts need no embedded program:
//! a font dictionary naming the face is enough for every conforming
//! viewer. Text drawn with them is encoded as WinAnsi (Windows-1252).

use std::fmt;
use std::str::FromStr;

use lopdf::{Dictionary, Object, ObjectId};

use crate::error::{Error, Result};
use super::output::OutputDocument;

/// Latin standard 14 fonts (the Symbol and ZapfDingbats faces use their own
/// built-in encodings and are not offered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    pub const ALL: [Self; 12] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
    ];

    /// PostScript name written as `/BaseFont`
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }
}

impl FromStr for StandardFont {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|font| font.base_font().eq_ignore_ascii_case(wanted))
            .or_else(|| wanted.eq_ignore_ascii_case("Times").then_some(Self::TimesRoman))
            .ok_or_else(|| Error::FontEmbed(format!("'{s}' is not a standard font")))
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_font())
    }
}

/// A standard font registered in an output document.
///
/// Created once per merge and shared by every stamp drawn in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontHandle {
    pub id: ObjectId,
    pub font: StandardFont,
}

/// Add a font dictionary for the named standard font to `output`.
pub fn embed_standard_font(output: &mut OutputDocument, font_name: &str) -> Result<FontHandle> {
    let font: StandardFont = font_name.parse()?;

    let id = output.document_mut().add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));

    Ok(FontHandle { id, font })
}

/// Encode text as WinAnsi bytes.
///
/// Returns the first character that has no WinAnsi code point.
pub fn encode_win_ansi(text: &str) -> std::result::Result<Vec<u8>, char> {
    text.chars().map(|c| win_ansi_byte(c).ok_or(c)).collect()
}

/// Decode WinAnsi bytes back to text. Undefined codes decode to U+FFFD.
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WIN_ANSI_HIGH
                .iter()
                .find(|&&(_, code)| code == b)
                .map_or(char::REPLACEMENT_CHARACTER, |&(c, _)| c),
            _ => char::from(b),
        })
        .collect()
}

/// Windows-1252 assignments in 0x80..=0x9F; everything else is Latin-1.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

fn win_ansi_byte(c: char) -> Option<u8> {
    match u32::from(c) {
        #[allow(clippy::cast_possible_truncation)] // Range checked by the pattern
        code @ (0x20..=0x7E | 0xA0..=0xFF) => Some(code as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|&&(mapped, _)| mapped == c)
            .map(|&(_, code)| code),
    }
}
