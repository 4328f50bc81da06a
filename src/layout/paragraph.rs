//! Paragraph splitting and line breaking.

use super::font::Font;

/// A paragraph of input text.
///
/// Each segment ends in a forced line break except the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub segments: Vec<String>,
}

/// One broken line ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Words, joined by single spaces when drawn
    pub words: Vec<String>,
    /// Natural width in points
    pub width: f32,
    /// Last line of a paragraph or of a forced-break segment
    pub ends_segment: bool,
}

impl Line {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// Number of inter-word gaps.
    pub fn gaps(&self) -> usize {
        self.words.len().saturating_sub(1)
    }
}

/// Split text into paragraphs on blank lines.
///
/// Two consecutive newlines delimit paragraphs; a single newline inside a
/// paragraph is a forced line break. Paragraphs with no visible text are
/// dropped, and newlines at either end of a paragraph are ignored.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    text.split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| Paragraph {
            segments: p.trim_matches('\n').split('\n').map(str::to_string).collect(),
        })
        .collect()
}

/// Break a paragraph into lines no wider than `max_width`.
///
/// Greedy: words are added while they fit. A word wider than a whole line
/// is broken between characters.
pub fn wrap(paragraph: &Paragraph, font: Font, size: f32, max_width: f32) -> Vec<Line> {
    let space = font.text_width(" ", size);
    let mut lines = Vec::new();

    for segment in &paragraph.segments {
        let mut current: Vec<String> = Vec::new();
        let mut width = 0.0f32;

        for word in segment.split_whitespace() {
            for piece in fit_word(word, font, size, max_width) {
                let piece_width = font.text_width(&piece, size);
                let needed = if current.is_empty() {
                    piece_width
                } else {
                    width + space + piece_width
                };

                if !current.is_empty() && needed > max_width {
                    lines.push(Line {
                        words: std::mem::take(&mut current),
                        width,
                        ends_segment: false,
                    });
                    width = piece_width;
                } else {
                    width = needed;
                }
                current.push(piece);
            }
        }

        // An empty segment still takes a line.
        lines.push(Line {
            words: current,
            width,
            ends_segment: true,
        });
    }

    lines
}

/// Split a word into pieces that each fit on a line.
fn fit_word(word: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    if font.text_width(word, size) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0f32;
    for c in word.chars() {
        let w = f32::from(font.char_width(c)) * size / 1000.0;
        if !piece.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn para(s: &str) -> Paragraph {
        Paragraph {
            segments: s.split('\n').map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_split_paragraphs() {
        let paragraphs = split_paragraphs("First one.\n\nSecond\nwith break.\n\n   \n\nThird.");
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].segments, vec!["First one."]);
        assert_eq!(paragraphs[1].segments, vec!["Second", "with break."]);
        assert_eq!(paragraphs[2].segments, vec!["Third."]);
    }

    #[test]
    fn test_split_paragraphs_extra_newlines() {
        let paragraphs = split_paragraphs("a\n\n\nb\n");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1].segments, vec!["b"]);
        assert!(split_paragraphs("\n\n  \n\n").is_empty());
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        let lines = wrap(&para("hello world"), Font::Helvetica, 12.0, 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world");
        assert!(lines[0].ends_segment);
        let expected = Font::Helvetica.text_width("hello world", 12.0);
        assert!((lines[0].width - expected).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_breaks_greedily() {
        // Each "aaaa" is 4 * 556 * 10 / 1000 = 22.24pt; a space is 2.78pt.
        let lines = wrap(&para("aaaa aaaa aaaa"), Font::Helvetica, 10.0, 50.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words, vec!["aaaa", "aaaa"]);
        assert!(!lines[0].ends_segment);
        assert_eq!(lines[1].words, vec!["aaaa"]);
        assert!(lines[1].ends_segment);
        for line in &lines {
            assert!(line.width <= 50.0);
        }
    }

    #[test]
    fn test_wrap_forced_breaks() {
        let lines = wrap(&para("one\ntwo"), Font::Helvetica, 12.0, 500.0);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.ends_segment));
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap(&para("mmmmmmmmmm"), Font::Helvetica, 10.0, 30.0);
        // m = 8.33pt, three per line.
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text(), "mmm");
        assert_eq!(lines[3].text(), "m");
    }

    #[test]
    fn test_wrap_empty_segment() {
        let lines = wrap(&para("a\n\u{20}\nb"), Font::Helvetica, 12.0, 100.0);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].words.is_empty());
        assert_eq!(lines[1].gaps(), 0);
    }
}
