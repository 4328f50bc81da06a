//! Standard-14 font metrics and WinAnsi text encoding.

use unicode_normalization::UnicodeNormalization;

/// Advance widths (1/1000 em) for ASCII 32..=126, Helvetica.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths (1/1000 em) for ASCII 32..=126, Helvetica-Bold.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Advance widths for Latin-1 0xA0..=0xFF, Helvetica.
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // Agrave..Idieresis
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..germandbls
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // agrave..idieresis
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // eth..ydieresis
];

/// Advance widths for Latin-1 0xA0..=0xFF, Helvetica-Bold.
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // Agrave..Idieresis
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..germandbls
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // agrave..idieresis
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // eth..ydieresis
];

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
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

/// Character substituted for anything WinAnsi cannot encode.
pub const REPLACEMENT: char = '?';

/// The fonts the typesetter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Body text
    Helvetica,
    /// Title
    HelveticaBold,
}

impl Font {
    /// PostScript name for `/BaseFont`.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name under `/Font` in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// Advance width of `c` in 1/1000 em.
    pub fn char_width(self, c: char) -> u16 {
        let (ascii, latin1) = match self {
            Font::Helvetica => (&HELVETICA_ASCII, &HELVETICA_LATIN1),
            Font::HelveticaBold => (&HELVETICA_BOLD_ASCII, &HELVETICA_BOLD_LATIN1),
        };
        let bold = self == Font::HelveticaBold;
        match c {
            ' '..='~' => ascii[c as usize - 32],
            '\u{00A0}'..='\u{00FF}' => latin1[c as usize - 0xA0],
            '\u{0152}' | '\u{2122}' => 1000,
            '\u{0153}' => 944,
            '\u{0160}' | '\u{0178}' => 667,
            '\u{017D}' => 611,
            '\u{0161}' => {
                if bold {
                    556
                } else {
                    500
                }
            }
            '\u{017E}' => 500,
            '\u{02C6}' | '\u{02DC}' | '\u{2039}' | '\u{203A}' => 333,
            '\u{2013}' | '\u{20AC}' => 556,
            '\u{2014}' | '\u{2026}' | '\u{2030}' => 1000,
            '\u{2018}' | '\u{2019}' | '\u{201A}' => {
                if bold {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' | '\u{201E}' => {
                if bold {
                    500
                } else {
                    333
                }
            }
            '\u{2022}' => 350,
            _ => 556,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

/// WinAnsi byte for `c`, if it has one.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' | '\u{00A0}'..='\u{00FF}' => Some(c as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|&(_, b)| b),
    }
}

/// Encode text that has been through [`sanitize`].
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(REPLACEMENT as u8))
        .collect()
}

/// Normalize input text for the standard-14 fonts.
///
/// Applies NFC, converts CRLF and CR to LF, expands tabs to a space and
/// replaces every other character WinAnsi cannot encode with `?`. Returns
/// the cleaned text and the number of replaced characters.
pub fn sanitize(text: &str) -> (String, usize) {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut replaced = 0;
    let cleaned = unified
        .nfc()
        .map(|c| match c {
            '\n' => '\n',
            '\t' => ' ',
            c if win_ansi_byte(c).is_some() => c,
            _ => {
                replaced += 1;
                REPLACEMENT
            }
        })
        .collect();
    (cleaned, replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_widths() {
        assert_eq!(Font::Helvetica.char_width(' '), 278);
        assert_eq!(Font::Helvetica.char_width('A'), 667);
        assert_eq!(Font::Helvetica.char_width('i'), 222);
        assert_eq!(Font::Helvetica.char_width('~'), 584);
        assert_eq!(Font::HelveticaBold.char_width('b'), 611);
        assert_eq!(Font::HelveticaBold.char_width('@'), 975);
    }

    #[test]
    fn test_latin1_widths() {
        assert_eq!(Font::Helvetica.char_width('\u{00A0}'), 278);
        assert_eq!(Font::Helvetica.char_width('\u{00C6}'), 1000);
        assert_eq!(Font::Helvetica.char_width('\u{00DF}'), 611);
        assert_eq!(Font::Helvetica.char_width('\u{00E7}'), 500);
        assert_eq!(Font::Helvetica.char_width('\u{00EF}'), 278);
        assert_eq!(Font::Helvetica.char_width('\u{00FF}'), 500);
        assert_eq!(Font::HelveticaBold.char_width('\u{00E7}'), 556);
        assert_eq!(Font::HelveticaBold.char_width('\u{00F6}'), 611);
        assert_eq!(Font::HelveticaBold.char_width('\u{00C4}'), 722);
        assert_eq!(Font::Helvetica.char_width('\u{0153}'), 944);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        let width = Font::Helvetica.text_width("Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-4);
        assert_eq!(Font::Helvetica.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(win_ansi_byte('a'), Some(b'a'));
        assert_eq!(win_ansi_byte('\u{00E9}'), Some(0xE9));
        assert_eq!(win_ansi_byte('\u{2014}'), Some(0x97));
        assert_eq!(win_ansi_byte('\u{4E2D}'), None);
        assert_eq!(encode("caf\u{00E9}"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_sanitize() {
        let (text, replaced) = sanitize("a\r\nb\tc \u{4E2D}");
        assert_eq!(text, "a\nb c ?");
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_sanitize_composes() {
        // e + combining acute composes to a single WinAnsi character.
        let (text, replaced) = sanitize("e\u{0301}");
        assert_eq!(text, "\u{00E9}");
        assert_eq!(replaced, 0);
    }
}
