use placard_model::TextTransform;

/// Applies a text transform. Runs before any measurement so widths match
/// the glyphs actually drawn.
pub fn apply_transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => capitalize_words(text),
    }
}

fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms() {
        assert_eq!(apply_transform("Scan me", TextTransform::Uppercase), "SCAN ME");
        assert_eq!(apply_transform("Scan ME", TextTransform::Lowercase), "scan me");
        assert_eq!(
            apply_transform("leave a  review\nplease", TextTransform::Capitalize),
            "Leave A  Review\nPlease"
        );
        assert_eq!(apply_transform("as-is", TextTransform::None), "as-is");
    }
}
