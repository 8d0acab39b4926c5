//! Helvetica metrics and WinAnsi text mapping for the report renderer.
//!
//! The renderer uses the standard-14 Helvetica font, so no font file is
//! embedded and every viewer already has the glyphs. The price is a fixed
//! single-byte encoding: text must be folded into the WinAnsi/Latin-1 range
//! before it is measured and written.

/// Advance widths of Helvetica for code points 32..=126, in 1/1000 em
/// (Adobe AFM values).
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Width used for Latin-1 letters above 0x7F.
const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c as u32 {
        cp @ 32..=126 => HELVETICA_ASCII[(cp - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `s` in points at `font_size`.
pub fn string_width(s: &str, font_size: f32) -> f32 {
    let units: u32 = s.chars().map(|c| char_width(c) as u32).sum();
    units as f32 * font_size / 1000.0
}

/// Greedy word wrap of a single line.
///
/// Words are separated by any whitespace and rejoined with single spaces.
/// A word wider than `max_width` is kept whole on its own line. A line with
/// no words yields one empty line so that blank input lines keep their slot.
pub fn wrap_line(line: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let space = string_width(" ", font_size);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for word in line.split_whitespace() {
        let w = string_width(word, font_size);
        if current.is_empty() {
            current.push_str(word);
            width = w;
        } else if width + space + w <= max_width {
            current.push(' ');
            current.push_str(word);
            width += space + w;
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
            width = w;
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Fold arbitrary text into characters Helvetica/WinAnsi can show.
///
/// Typographic punctuation becomes its ASCII twin, arrows become words,
/// emoji are dropped and anything else outside Latin-1 becomes `?`.
pub fn to_win_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{25CF}' | '\u{25AA}' | '\u{25E6}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2192}' | '\u{27A1}' => out.push_str("->"),
            '\u{2190}' => out.push_str("<-"),
            '\u{2191}' | '\u{2197}' => out.push_str("[up]"),
            '\u{2193}' | '\u{2198}' => out.push_str("[down]"),
            '\u{00A0}' | '\u{2002}'..='\u{200A}' | '\t' => out.push(' '),
            '\u{20AC}' => out.push_str("EUR"),
            ' '..='~' | '\u{00A1}'..='\u{00FF}' => out.push(c),
            c if c.is_control() => {}
            '\u{FE00}'..='\u{FE0F}' | '\u{200B}'..='\u{200D}' => {}
            c if (c as u32) >= 0x1F000 || ('\u{2600}'..='\u{27BF}').contains(&c) => {}
            _ => out.push('?'),
        }
    }
    out
}

/// Single-byte encoding of text already passed through [`to_win_ansi`].
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(char_width(' '), 278);
        assert_eq!(char_width('@'), 1015);
        assert_eq!(char_width('W'), 944);
        assert_eq!(char_width('i'), 222);
        assert_eq!(char_width('~'), 584);
        assert_eq!(char_width('é'), FALLBACK_WIDTH);
    }

    #[test]
    fn width_scales_with_size() {
        // "Hello" = 722 + 556 + 222 + 222 + 556 = 2278 units
        assert!((string_width("Hello", 12.0) - 27.336).abs() < 1e-3);
        assert!((string_width("Hello", 24.0) - 54.672).abs() < 1e-3);
    }

    #[test]
    fn short_line_is_untouched() {
        assert_eq!(wrap_line("Net income rose", 520.0, 12.0), vec!["Net income rose"]);
    }

    #[test]
    fn blank_line_keeps_one_slot() {
        assert_eq!(wrap_line("", 520.0, 12.0), vec![String::new()]);
        assert_eq!(wrap_line("   ", 520.0, 12.0), vec![String::new()]);
    }

    #[test]
    fn long_line_wraps_within_width() {
        let line = "revenue ".repeat(60);
        let wrapped = wrap_line(&line, 520.0, 12.0);
        assert!(wrapped.len() > 1);
        for l in &wrapped {
            assert!(string_width(l, 12.0) <= 520.0, "too wide: {l}");
        }
        assert_eq!(wrapped.join(" "), line.trim());
    }

    #[test]
    fn oversized_word_stays_whole() {
        let word = "x".repeat(200);
        let wrapped = wrap_line(&format!("a {word} b"), 100.0, 12.0);
        assert_eq!(wrapped, vec!["a".to_string(), word, "b".to_string()]);
    }

    #[test]
    fn win_ansi_folding() {
        assert_eq!(to_win_ansi("“Q3” – up…"), "\"Q3\" - up...");
        assert_eq!(to_win_ansi("Margin ↑ 2%"), "Margin [up] 2%");
        assert_eq!(to_win_ansi("Growth 📈 café"), "Growth  café");
        assert_eq!(to_win_ansi("日本"), "??");
        assert_eq!(to_win_ansi("a\tb\r"), "a b");
    }

    #[test]
    fn latin1_encoding() {
        assert_eq!(encode_latin1("café"), vec![b'c', b'a', b'f', 0xE9]);
    }
}
