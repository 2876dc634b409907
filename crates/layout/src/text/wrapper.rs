use crate::fonts::FontMetrics;
use placard_model::WordWrap;

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Last line before an explicit newline or the end of the text.
    pub ends_paragraph: bool,
}

impl WrappedLine {
    fn new(text: String, ends_paragraph: bool) -> Self {
        Self { text, ends_paragraph }
    }
}

/// Breaks `text` into lines no wider than `max_width` where the wrap mode
/// allows it. Explicit newlines always break.
///
/// - `Normal` breaks at spaces; a word wider than the line stays whole.
/// - `BreakWord` additionally splits such a word between characters.
/// - `NoWrap` keeps each paragraph verbatim on one line.
pub fn wrap_text(
    text: &str,
    metrics: &dyn FontMetrics,
    font_size: f32,
    letter_spacing: f32,
    max_width: f32,
    mode: WordWrap,
) -> Vec<WrappedLine> {
    let measure = |s: &str| metrics.measure(s, font_size, letter_spacing);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if mode == WordWrap::NoWrap {
            lines.push(WrappedLine::new(paragraph.to_string(), true));
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() {
                let candidate = format!("{} {}", current, word);
                if measure(&candidate) <= max_width {
                    current = candidate;
                    continue;
                }
                lines.push(WrappedLine::new(std::mem::take(&mut current), false));
            }

            if mode == WordWrap::BreakWord && measure(word) > max_width {
                let mut pieces = break_word(word, &measure, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces.into_iter().map(|p| WrappedLine::new(p, false)));
            } else {
                current = word.to_string();
            }
        }
        lines.push(WrappedLine::new(current, true));
    }
    lines
}

/// Greedy character split. A piece holds at least one character, so a single
/// glyph wider than the line still gets a line of its own.
fn break_word(word: &str, measure: &dyn Fn(&str) -> f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && measure(&piece) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
