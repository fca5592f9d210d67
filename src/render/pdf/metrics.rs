//! Approximate Helvetica metrics for line wrapping.
//!
//! Widths are the standard base-14 Helvetica advance widths in 1/1000 em for
//! printable ASCII. Anything else gets the width of a digit. Bold text is
//! scaled up slightly instead of carrying a second table.

const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;
const BOLD_SCALE: f32 = 1.08;
const MM_PER_POINT: f32 = 25.4 / 72.0;

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..127).contains(&code) {
        HELVETICA_ASCII[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` in millimetres at `font_size` points.
pub fn text_width_mm(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let scale = if bold { BOLD_SCALE } else { 1.0 };
    units as f32 / 1000.0 * font_size * scale * MM_PER_POINT
}

/// Split `text` into lines no wider than `max_width_mm`.
///
/// Explicit newlines always break (an empty paragraph yields an empty line);
/// within a paragraph words are packed greedily and a word wider than the
/// whole line is broken between characters.
pub fn wrap(text: &str, max_width_mm: f32, font_size: f32, bold: bool) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, font_size, bold) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }

            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_font_size() {
        let small = text_width_mm("Hello", 10.0, false);
        let large = text_width_mm("Hello", 20.0, false);
        assert!((large - 2.0 * small).abs() < 1e-4);
        assert!(text_width_mm("Hello", 10.0, true) > small);
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap("Project Name: EcoTrack", 170.0, 12.0, true), vec!["Project Name: EcoTrack"]);
    }

    #[test]
    fn test_long_text_wraps_at_word_boundaries() {
        let text = "word ".repeat(80);
        let lines = wrap(text.trim(), 170.0, 11.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 11.0, false) <= 170.0);
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.trim());
    }

    #[test]
    fn test_newlines_break_and_empty_paragraphs_are_kept() {
        assert_eq!(wrap("a\n\nb", 170.0, 11.0, false), vec!["a", "", "b"]);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "x".repeat(400);
        let lines = wrap(&word, 50.0, 11.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }
}
