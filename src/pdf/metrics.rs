//! Font metrics for the standard Helvetica faces
//!
//! Advance widths come from the Adobe Core 14 AFM files, in 1/1000 em,
//! for every glyph of WinAnsiEncoding. Characters are measured as the byte
//! the writer will emit for them, so a `?` substitute is measured as `?`.
//! Text is measured in millimetres so the layout engine can compare it
//! against page geometry directly.

use serde::{Deserialize, Serialize};

/// Millimetres per PostScript point
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Helvetica widths for U+0020..=U+007E
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold widths for U+0020..=U+007E
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Helvetica widths for U+00A0..=U+00FF
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // Agrave..Idieresis
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..germandbls
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // agrave..idieresis
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // eth..ydieresis
];

/// Helvetica-Bold widths for U+00A0..=U+00FF
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // Agrave..Idieresis
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..germandbls
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // agrave..idieresis
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // eth..ydieresis
];

/// Font family available to the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontFamily {
    #[default]
    Helvetica,
}

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontFamily {
    /// PostScript name of the standard font for a weight
    pub fn base_font(&self, weight: FontWeight) -> &'static str {
        match (self, weight) {
            (FontFamily::Helvetica, FontWeight::Normal) => "Helvetica",
            (FontFamily::Helvetica, FontWeight::Bold) => "Helvetica-Bold",
        }
    }
}

/// WinAnsi byte drawn for `c`; unmappable characters become `?`
pub fn winansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\t' => b' ',
        _ => b'?',
    }
}

/// Advance width of one character in 1/1000 em, as drawn
pub fn char_width(family: FontFamily, weight: FontWeight, c: char) -> u16 {
    let (ascii, latin1) = match (family, weight) {
        (FontFamily::Helvetica, FontWeight::Normal) => (&HELVETICA, &HELVETICA_LATIN1),
        (FontFamily::Helvetica, FontWeight::Bold) => (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1),
    };
    let bold = weight == FontWeight::Bold;
    match winansi_byte(c) {
        b @ 0x20..=0x7E => ascii[usize::from(b - 0x20)],
        b @ 0xA0..=0xFF => latin1[usize::from(b - 0xA0)],
        0x80 => 556,
        0x85 | 0x97 | 0x99 => 1000,
        0x91 | 0x92 if bold => 278,
        0x91 | 0x92 => 222,
        0x93 | 0x94 if bold => 500,
        0x93 | 0x94 => 333,
        0x95 => 350,
        0x96 => 556,
        _ => ascii[usize::from(b'?' - 0x20)],
    }
}

/// Rendered width of `text` in millimetres at `size` points
pub fn text_width(text: &str, family: FontFamily, weight: FontWeight, size: f32) -> f64 {
    let units: u64 = text
        .chars()
        .map(|c| u64::from(char_width(family, weight, c)))
        .sum();
    units as f64 / 1000.0 * f64::from(size) * MM_PER_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(char_width(FontFamily::Helvetica, FontWeight::Normal, ' '), 278);
        assert_eq!(char_width(FontFamily::Helvetica, FontWeight::Normal, 'W'), 944);
        assert_eq!(char_width(FontFamily::Helvetica, FontWeight::Normal, 'i'), 222);
        assert_eq!(char_width(FontFamily::Helvetica, FontWeight::Bold, 'i'), 278);
        assert_eq!(char_width(FontFamily::Helvetica, FontWeight::Bold, '~'), 584);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Some heading text";
        let normal = text_width(text, FontFamily::Helvetica, FontWeight::Normal, 12.0);
        let bold = text_width(text, FontFamily::Helvetica, FontWeight::Bold, 12.0);
        assert!(bold > normal);
    }

    #[test]
    fn test_width_scales_with_size() {
        // 'H' is 722 units: 0.722 em at 72pt is 0.722 inch
        let width = text_width("H", FontFamily::Helvetica, FontWeight::Normal, 72.0);
        assert!((width - 0.722 * 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_measures_what_is_drawn() {
        let normal = |c| char_width(FontFamily::Helvetica, FontWeight::Normal, c);
        let bold = |c| char_width(FontFamily::Helvetica, FontWeight::Bold, c);

        assert_eq!(normal('\t'), normal(' '));
        assert_eq!(normal('\u{4e2d}'), normal('?'));
        assert_eq!(bold('\u{4e2d}'), 611);
        assert_eq!(normal('\u{e9}'), 556);
        assert_eq!(normal('\u{c6}'), 1000);
        assert_eq!(bold('\u{c0}'), 722);
        assert_eq!(normal('\u{a0}'), 278);
        assert_eq!(normal('\u{2019}'), 222);
        assert_eq!(bold('\u{201C}'), 500);
    }

    #[test]
    fn test_very_long_text_does_not_overflow() {
        let text = "W".repeat(5_000_000);
        let width = text_width(&text, FontFamily::Helvetica, FontWeight::Normal, 11.0);
        let expected = 5_000_000.0 * 0.944 * 11.0 * MM_PER_PT;
        assert!((width - expected).abs() < 1e-3 * expected);
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(FontFamily::Helvetica.base_font(FontWeight::Normal), "Helvetica");
        assert_eq!(FontFamily::Helvetica.base_font(FontWeight::Bold), "Helvetica-Bold");
    }
}
