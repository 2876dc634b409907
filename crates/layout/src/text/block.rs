//! Places a text element's lines inside its content box.
//!
//! Coordinates are relative to the content box's top-left corner with y
//! growing downwards. Lengths are in points; [`TextBlockLayout::scaled`]
//! converts to another unit.

use super::fit::optimal_font_size;
use super::transform::apply_transform;
use super::wrapper::{WrappedLine, wrap_text};
use crate::fonts::FontMetrics;
use placard_model::{
    Element, HorizontalAlign, TextAlign, TextDecoration, TextOverflow, VerticalAlign, resolve_alignment,
};
use placard_types::Size;
use serde::Serialize;

/// Baseline offset below the top of a line box, as a fraction of the line
/// height.
pub const BASELINE_RATIO: f32 = 0.7;

pub const ELLIPSIS: &str = "...";

/// A piece of text drawn at one x position on its line's baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRun {
    pub text: String,
    pub x: f32,
}

/// An underline or strike-through segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecorationSegment {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the first run.
    pub x: f32,
    pub baseline: f32,
    /// Drawn extent from `x` to the end of the last run.
    pub width: f32,
    pub runs: Vec<PlacedRun>,
    pub decoration: Option<DecorationSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlockLayout {
    pub font_size: f32,
    pub line_height: f32,
    pub block_height: f32,
    pub lines: Vec<PlacedLine>,
    /// Lines were dropped by `maxLines` or a clipping overflow mode.
    pub truncated: bool,
    /// Shrunk below the requested size to fit.
    pub shrunk: bool,
}

impl TextBlockLayout {
    /// Multiplies every length by `factor`.
    pub fn scaled(mut self, factor: f32) -> Self {
        self.font_size *= factor;
        self.line_height *= factor;
        self.block_height *= factor;
        for line in &mut self.lines {
            line.x *= factor;
            line.baseline *= factor;
            line.width *= factor;
            for run in &mut line.runs {
                run.x *= factor;
            }
            if let Some(deco) = &mut line.decoration {
                deco.x *= factor;
                deco.y *= factor;
                deco.width *= factor;
                deco.thickness *= factor;
            }
        }
        self
    }
}

/// Lays out `text` (already resolved from the element's field binding) in a
/// content box of `content` points using the element's text style.
pub fn layout_text(element: &Element, text: &str, content: Size, metrics: &dyn FontMetrics) -> TextBlockLayout {
    let style = &element.text_style;
    let text = apply_transform(text, style.text_transform);
    let letter_spacing = style.letter_spacing;

    let font_size = optimal_font_size(
        &text,
        metrics,
        style.font_size,
        letter_spacing,
        style.line_height,
        content.width,
        content.height,
    );
    let line_height = font_size * style.line_height;
    let measure = |s: &str| metrics.measure(s, font_size, letter_spacing);

    let mut lines = wrap_text(&text, metrics, font_size, letter_spacing, content.width, style.word_wrap);

    let mut limit = style.max_lines.unwrap_or(usize::MAX).max(1);
    if matches!(style.overflow, TextOverflow::Hidden | TextOverflow::Ellipsis) && line_height > 0.0 {
        let fitting = ((content.height + 1e-3) / line_height).floor() as usize;
        limit = limit.min(fitting.max(1));
    }
    let truncated = lines.len() > limit;
    if truncated {
        lines.truncate(limit);
        if style.overflow == TextOverflow::Ellipsis
            && let Some(last) = lines.last_mut()
        {
            last.text = with_ellipsis(&last.text, &measure, content.width);
            last.ends_paragraph = true;
        }
    }

    let block_height = lines.len() as f32 * line_height;
    let top = match style.vertical_align {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Middle => (content.height - block_height) / 2.0,
        VerticalAlign::Bottom => content.height - block_height,
    };

    let align = resolve_alignment(element);
    let justify = style.text_align == TextAlign::Justify;

    let placed = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let baseline = top + i as f32 * line_height + BASELINE_RATIO * line_height;
            place_line(line, baseline, align, justify, content.width, font_size, letter_spacing, metrics)
        })
        .map(|mut line| {
            line.decoration = decoration(style.text_decoration, &line, font_size);
            line
        })
        .collect();

    TextBlockLayout {
        font_size,
        line_height,
        block_height,
        lines: placed,
        truncated,
        shrunk: font_size < style.font_size,
    }
}

/// Trims characters from the end until the text plus an ellipsis fits.
fn with_ellipsis(text: &str, measure: &dyn Fn(&str) -> f32, max_width: f32) -> String {
    let mut kept: Vec<char> = text.trim_end().chars().collect();
    loop {
        let candidate: String = kept.iter().collect::<String>() + ELLIPSIS;
        if kept.is_empty() || measure(&candidate) <= max_width {
            return candidate;
        }
        kept.pop();
        while kept.last().is_some_and(|c| c.is_whitespace()) {
            kept.pop();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn place_line(
    line: &WrappedLine,
    baseline: f32,
    align: HorizontalAlign,
    justify: bool,
    max_width: f32,
    font_size: f32,
    letter_spacing: f32,
    metrics: &dyn FontMetrics,
) -> PlacedLine {
    let measure = |s: &str| metrics.measure(s, font_size, letter_spacing);
    let words: Vec<&str> = line.text.split_whitespace().collect();

    if justify && !line.ends_paragraph && words.len() >= 2 {
        let words_width: f32 = words.iter().map(|w| measure(w)).sum();
        let gap = (max_width - words_width) / (words.len() - 1) as f32;
        let mut runs = Vec::new();
        let mut x = 0.0;
        for word in &words {
            push_runs(&mut runs, word, x, font_size, letter_spacing, metrics);
            x += measure(word) + gap;
        }
        return PlacedLine {
            text: line.text.clone(),
            x: 0.0,
            baseline,
            width: max_width.max(words_width),
            runs,
            decoration: None,
        };
    }

    let width = measure(&line.text);
    let x = match align {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => (max_width - width) / 2.0,
        HorizontalAlign::Right => max_width - width,
    };
    let mut runs = Vec::new();
    push_runs(&mut runs, &line.text, x, font_size, letter_spacing, metrics);
    PlacedLine {
        text: line.text.clone(),
        x,
        baseline,
        width,
        runs,
        decoration: None,
    }
}

/// One run for the whole string, or one per character when letter spacing
/// is set, advancing by glyph width plus spacing.
fn push_runs(
    runs: &mut Vec<PlacedRun>,
    text: &str,
    x: f32,
    font_size: f32,
    letter_spacing: f32,
    metrics: &dyn FontMetrics,
) {
    if text.is_empty() {
        return;
    }
    if letter_spacing == 0.0 {
        runs.push(PlacedRun {
            text: text.to_string(),
            x,
        });
        return;
    }
    let mut cursor = x;
    for c in text.chars() {
        runs.push(PlacedRun {
            text: c.to_string(),
            x: cursor,
        });
        cursor += metrics.char_width(c, font_size) + letter_spacing;
    }
}

fn decoration(kind: TextDecoration, line: &PlacedLine, font_size: f32) -> Option<DecorationSegment> {
    let offset = match kind {
        TextDecoration::None => return None,
        TextDecoration::Underline => 0.12 * font_size,
        TextDecoration::LineThrough => -0.3 * font_size,
    };
    if line.width <= 0.0 {
        return None;
    }
    Some(DecorationSegment {
        x: line.x,
        y: line.baseline + offset,
        width: line.width,
        thickness: (font_size * 0.06).max(0.5),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{StandardFont, StandardFontMetrics};
    use placard_model::{ElementKind, Position, TextStyle, WordWrap};

    fn helvetica() -> StandardFontMetrics {
        StandardFontMetrics::new(StandardFont::Helvetica)
    }

    fn element(style: TextStyle) -> Element {
        Element::new(ElementKind::Text, Position { x: 50.0, y: 50.0 }).with_text_style(style)
    }

    #[test]
    fn fitting_text_keeps_size_and_centers_vertically() {
        let el = element(TextStyle {
            font_size: 10.0,
            ..Default::default()
        });
        let layout = layout_text(&el, "Hello", Size::new(200.0, 40.0), &helvetica());
        assert_eq!(layout.font_size, 10.0);
        assert!(!layout.shrunk);
        assert_eq!(layout.lines.len(), 1);
        let line_height = 12.0;
        let expected = (40.0 - line_height) / 2.0 + 0.7 * line_height;
        assert!((layout.lines[0].baseline - expected).abs() < 1e-4);
    }

    #[test]
    fn vertical_anchors() {
        let metrics = helvetica();
        let mut style = TextStyle {
            font_size: 10.0,
            vertical_align: VerticalAlign::Top,
            ..Default::default()
        };
        let top = layout_text(&element(style.clone()), "Hi", Size::new(100.0, 50.0), &metrics);
        assert!((top.lines[0].baseline - 8.4).abs() < 1e-4);

        style.vertical_align = VerticalAlign::Bottom;
        let bottom = layout_text(&element(style), "Hi", Size::new(100.0, 50.0), &metrics);
        assert!((bottom.lines[0].baseline - (50.0 - 12.0 + 8.4)).abs() < 1e-4);
    }

    #[test]
    fn horizontal_alignment_uses_measured_width() {
        let metrics = helvetica();
        let width = metrics.measure("Hi", 10.0, 0.0);
        for (align, expected) in [
            (TextAlign::Left, 0.0),
            (TextAlign::Center, (100.0 - width) / 2.0),
            (TextAlign::Right, 100.0 - width),
        ] {
            let el = element(TextStyle {
                font_size: 10.0,
                text_align: align,
                ..Default::default()
            });
            let layout = layout_text(&el, "Hi", Size::new(100.0, 30.0), &metrics);
            assert!((layout.lines[0].x - expected).abs() < 1e-4, "{:?}", align);
        }
    }

    #[test]
    fn single_word_justify_is_left_aligned() {
        let el = element(TextStyle {
            font_size: 10.0,
            text_align: TextAlign::Justify,
            ..Default::default()
        });
        let layout = layout_text(&el, "Welcome", Size::new(200.0, 30.0), &helvetica());
        let line = &layout.lines[0];
        assert_eq!(line.x, 0.0);
        assert_eq!(line.runs.len(), 1);
        assert_eq!(line.runs[0].x, 0.0);
    }

    #[test]
    fn justify_spreads_non_last_lines_only() {
        let metrics = helvetica();
        // Requested size too large for one line, so it shrinks to the floor
        // and wraps there.
        let el = element(TextStyle {
            font_size: 6.0,
            text_align: TextAlign::Justify,
            ..Default::default()
        });
        let text = "one two three four five six seven eight nine ten";
        let layout = layout_text(&el, text, Size::new(60.0, 100.0), &metrics);
        assert!(layout.lines.len() >= 2);

        let first = &layout.lines[0];
        let last_run = first.runs.last().unwrap();
        let end = last_run.x + metrics.measure(&last_run.text, layout.font_size, 0.0);
        assert!((end - 60.0).abs() < 1e-3);

        let last = layout.lines.last().unwrap();
        assert_eq!(last.runs.len(), 1);
        assert_eq!(last.x, 0.0);
    }

    #[test]
    fn letter_spacing_places_each_character() {
        let metrics = helvetica();
        let el = element(TextStyle {
            font_size: 10.0,
            letter_spacing: 2.0,
            ..Default::default()
        });
        let layout = layout_text(&el, "AV", Size::new(100.0, 30.0), &metrics);
        let runs = &layout.lines[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].x, 0.0);
        assert!((runs[1].x - (6.67 + 2.0)).abs() < 1e-4);
    }

    #[test]
    fn max_lines_with_ellipsis_truncates_last_line() {
        let metrics = helvetica();
        let el = element(TextStyle {
            font_size: 6.0,
            max_lines: Some(2),
            overflow: TextOverflow::Ellipsis,
            ..Default::default()
        });
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda";
        let layout = layout_text(&el, text, Size::new(40.0, 100.0), &metrics);
        assert!(layout.truncated);
        assert_eq!(layout.lines.len(), 2);
        let last = &layout.lines[1];
        assert!(last.text.ends_with(ELLIPSIS));
        assert!(metrics.measure(&last.text, layout.font_size, 0.0) <= 40.0);
    }

    #[test]
    fn hidden_overflow_drops_lines_below_the_box() {
        let el = element(TextStyle {
            font_size: 6.0,
            overflow: TextOverflow::Hidden,
            word_wrap: WordWrap::BreakWord,
            ..Default::default()
        });
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda";
        let layout = layout_text(&el, text, Size::new(30.0, 16.0), &helvetica());
        // 16pt holds two 7.2pt lines.
        assert_eq!(layout.lines.len(), 2);
        assert!(layout.truncated);
        assert!(layout.block_height <= 16.0);
    }

    #[test]
    fn text_transform_applies_before_measuring() {
        let el = element(TextStyle {
            font_size: 10.0,
            text_transform: placard_model::TextTransform::Uppercase,
            ..Default::default()
        });
        let metrics = helvetica();
        let layout = layout_text(&el, "menu", Size::new(200.0, 30.0), &metrics);
        assert_eq!(layout.lines[0].text, "MENU");
        assert!((layout.lines[0].width - metrics.measure("MENU", 10.0, 0.0)).abs() < 1e-4);
    }

    #[test]
    fn underline_spans_measured_width() {
        let el = element(TextStyle {
            font_size: 10.0,
            text_decoration: TextDecoration::Underline,
            text_align: TextAlign::Center,
            ..Default::default()
        });
        let layout = layout_text(&el, "Sale", Size::new(100.0, 30.0), &helvetica());
        let line = &layout.lines[0];
        let deco = line.decoration.unwrap();
        assert_eq!(deco.x, line.x);
        assert_eq!(deco.width, line.width);
        assert!(deco.y > line.baseline);
    }

    #[test]
    fn scaled_multiplies_lengths() {
        let el = element(TextStyle {
            font_size: 10.0,
            ..Default::default()
        });
        let layout = layout_text(&el, "Hi", Size::new(100.0, 30.0), &helvetica());
        let doubled = layout.clone().scaled(2.0);
        assert_eq!(doubled.font_size, 20.0);
        assert_eq!(doubled.lines[0].baseline, layout.lines[0].baseline * 2.0);
    }
}
