//! The layout used for batch items when the batch carries no custom design.

use placard_model::{
    Element, ElementKind, FontWeight, Layout, PageType, Position, SemanticField, TextAlign, TextStyle,
};

pub const QR_ELEMENT_ID: &str = "qr";
pub const CAPTION_ELEMENT_ID: &str = "caption";
pub const LABEL_ELEMENT_ID: &str = "label";

fn caption_style(page_type: PageType, weight: FontWeight) -> TextStyle {
    TextStyle {
        font_size: page_type.caption_font_size(),
        font_weight: weight,
        text_align: TextAlign::Center,
        ..TextStyle::default()
    }
}

/// A centered QR code with the export id underneath. When `with_label` is
/// set, a smaller label line sits above the code.
pub fn default_layout(page_type: PageType, with_label: bool) -> Layout {
    let center = Position { x: 50.0, y: 50.0 };
    let mut layout = Layout::new(page_type)
        .with_element(
            Element::new(ElementKind::QrCode, center)
                .with_id(QR_ELEMENT_ID)
                .bound_to(SemanticField::QrUrl)
                .at(15.0, 15.0, 70.0, 62.0),
        )
        .with_element(
            Element::new(ElementKind::Text, center)
                .with_id(CAPTION_ELEMENT_ID)
                .bound_to(SemanticField::ExportId)
                .at(10.0, 80.0, 80.0, 12.0)
                .with_text_style(caption_style(page_type, FontWeight::Bold)),
        );
    if with_label {
        let mut style = caption_style(page_type, FontWeight::Regular);
        style.font_size *= 0.75;
        layout = layout.with_element(
            Element::new(ElementKind::Text, center)
                .with_id(LABEL_ELEMENT_ID)
                .bound_to(SemanticField::Label)
                .at(10.0, 3.0, 80.0, 10.0)
                .with_text_style(style),
        );
    }
    layout
}
