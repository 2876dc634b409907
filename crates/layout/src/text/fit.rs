use crate::fonts::FontMetrics;

/// Smallest size the fitting loop will shrink to, in points.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Decrement per fitting step, in points.
pub const FONT_SIZE_STEP: f32 = 0.5;

/// Shrinks `requested` in [`FONT_SIZE_STEP`] decrements until the text set on
/// a single line fits `max_width` and one line of it fits `max_height`.
/// Never goes below [`MIN_FONT_SIZE`] and never grows the size.
///
/// Explicit line breaks are honored: the widest line is what must fit.
pub fn optimal_font_size(
    text: &str,
    metrics: &dyn FontMetrics,
    requested: f32,
    letter_spacing: f32,
    line_height: f32,
    max_width: f32,
    max_height: f32,
) -> f32 {
    let overflows = |size: f32| {
        let widest = text
            .split('\n')
            .map(|line| metrics.measure(line, size, letter_spacing))
            .fold(0.0f32, f32::max);
        widest > max_width || size * line_height > max_height
    };

    let mut size = requested;
    while size > MIN_FONT_SIZE && overflows(size) {
        size = (size - FONT_SIZE_STEP).max(MIN_FONT_SIZE);
    }
    size
}
