//! Paints a layout's elements into a single page content stream.

use crate::resources::PageResources;
use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use placard_layout::{FontMetrics, StandardFont, StandardFontMetrics, TextBlockLayout, layout_text};
use placard_model::{BorderStyle, BoxStyle, Element, ElementKind, FieldValues, Layout, TextOverflow};
use placard_render_core::utils::{flip_y, to_win_ansi};
use placard_render_core::{
    ElementGeometry, GraphicsStateStack, MarkupConverter, PathSegment, RenderError, RenderOptions, VectorGraphic,
};
use placard_traits::{QrImage, QrMatrix, QrProvider, QrRequest};
use placard_types::{Color, Point, Rect};

pub const QR_UNAVAILABLE_LABEL: &str = "QR unavailable";

/// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

const PLACEHOLDER_FILL: Color = Color {
    r: 238,
    g: 238,
    b: 238,
    a: 1.0,
};
const PLACEHOLDER_STROKE: Color = Color {
    r: 153,
    g: 153,
    b: 153,
    a: 1.0,
};
const PLACEHOLDER_TEXT: Color = Color {
    r: 102,
    g: 102,
    b: 102,
    a: 1.0,
};

/// The content stream being built plus the graphics state it implies.
struct Pen<'s> {
    state: &'s mut GraphicsStateStack,
    ops: &'s mut Vec<Operation>,
}

impl Pen<'_> {
    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn scoped<T>(&mut self, draw: impl FnOnce(&mut Pen) -> Result<T, RenderError>) -> Result<T, RenderError> {
        self.state.scoped(self.ops, |state, ops| draw(&mut Pen { state, ops }))
    }

    fn fill_color(&mut self, color: &Color) {
        self.state.set_fill(self.ops, color);
    }

    fn rect(&mut self, rect: Rect) {
        self.op(
            "re",
            vec![rect.x.into(), rect.y.into(), rect.width.into(), rect.height.into()],
        );
    }

    /// Rectangle path with circular corners; `rect` in PDF coordinates.
    fn rounded_rect(&mut self, rect: Rect, radius: f32) {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
        if r <= 0.0 {
            self.rect(rect);
            return;
        }
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        let k = KAPPA * r;
        let curve = |pen: &mut Pen, pts: [f32; 6]| pen.op("c", pts.iter().map(|v| Object::from(*v)).collect());
        self.op("m", vec![(x + r).into(), y.into()]);
        self.op("l", vec![(x + w - r).into(), y.into()]);
        curve(self, [x + w - r + k, y, x + w, y + r - k, x + w, y + r]);
        self.op("l", vec![(x + w).into(), (y + h - r).into()]);
        curve(self, [x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h]);
        self.op("l", vec![(x + r).into(), (y + h).into()]);
        curve(self, [x + r - k, y + h, x, y + h - r + k, x, y + h - r]);
        self.op("l", vec![x.into(), (y + r).into()]);
        curve(self, [x, y + r - k, x + r - k, y, x + r, y]);
        self.op("h", vec![]);
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.op("Tf", vec![Object::Name(font.as_bytes().to_vec()), size.into()]);
        self.op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), y.into()]);
        self.op("Tj", vec![Object::String(to_win_ansi(text), StringFormat::Literal)]);
    }
}

pub(crate) struct PagePainter<'a> {
    pub resources: &'a mut PageResources,
    pub qr: &'a dyn QrProvider,
    pub markup: &'a dyn MarkupConverter,
    pub options: &'a RenderOptions,
}

impl PagePainter<'_> {
    /// Paints every element back to front. Missing bound fields fail here
    /// only under [`placard_model::MissingFieldPolicy::Fail`].
    pub fn paint(&mut self, layout: &Layout, fields: &FieldValues) -> Result<Content, RenderError> {
        let mut state = GraphicsStateStack::new();
        let mut ops = Vec::new();
        for element in &layout.elements {
            let text = element.resolve_text(fields, self.options.missing_fields)?;
            let geometry = ElementGeometry::resolve(element, layout.page_type);
            state.scoped(&mut ops, |state, ops| {
                self.paint_element(&mut Pen { state, ops }, element, &text, &geometry)
            })?;
        }
        debug!(
            "Painted {} element(s) into {} operation(s)",
            layout.elements.len(),
            ops.len()
        );
        Ok(Content { operations: ops })
    }

    fn paint_element(
        &mut self,
        pen: &mut Pen,
        element: &Element,
        text: &str,
        geometry: &ElementGeometry,
    ) -> Result<(), RenderError> {
        if element.rotation != 0.0 {
            // Clockwise on screen is clockwise on paper; PDF angles run counter-clockwise.
            let theta = (-element.rotation).to_radians();
            let (sin, cos) = theta.sin_cos();
            let c = geometry.pdf_center();
            let e = c.x - cos * c.x + sin * c.y;
            let f = c.y - sin * c.x - cos * c.y;
            pen.op("cm", vec![cos.into(), sin.into(), (-sin).into(), cos.into(), e.into(), f.into()]);
        }

        let translucent = element.opacity < 1.0;
        if translucent {
            let name = self.resources.opacity(element.opacity);
            pen.state.set_opacity(pen.ops, &name, element.opacity);
        }

        self.paint_box(pen, &element.box_style, geometry);
        match element.kind {
            ElementKind::Text => self.paint_text(pen, element, text, geometry)?,
            ElementKind::QrCode => self.paint_qr(pen, element, text, geometry)?,
            ElementKind::Image => {
                let label = if text.trim().is_empty() { "Image" } else { text };
                self.paint_placeholder(pen, geometry.pdf_rect(geometry.content_box), label)?;
            }
        }

        if translucent {
            let name = self.resources.opacity(1.0);
            pen.state.set_opacity(pen.ops, &name, 1.0);
        }
        Ok(())
    }

    fn paint_box(&mut self, pen: &mut Pen, style: &BoxStyle, geometry: &ElementGeometry) {
        let rect = geometry.pdf_rect(geometry.border_box);
        let radius = rect.width.min(rect.height) * style.border_radius / 100.0;

        if let Some(background) = style.background_color.as_ref().filter(|c| !c.is_transparent()) {
            pen.fill_color(background);
            pen.rounded_rect(rect, radius);
            pen.op("f", vec![]);
        }

        if style.has_border() {
            let width = style.border_width;
            pen.state.set_stroke(pen.ops, &style.border_color);
            pen.state.set_line_width(pen.ops, width);
            match style.border_style {
                BorderStyle::Dashed => pen.state.set_dash(pen.ops, &[width * 3.0, width * 2.0]),
                BorderStyle::Dotted => pen.state.set_dash(pen.ops, &[width, width]),
                _ => {}
            }
            pen.rounded_rect(rect, radius);
            pen.op("S", vec![]);
            pen.state.set_dash(pen.ops, &[]);
        }
    }

    fn paint_text(
        &mut self,
        pen: &mut Pen,
        element: &Element,
        text: &str,
        geometry: &ElementGeometry,
    ) -> Result<(), RenderError> {
        let style = &element.text_style;
        let metrics = StandardFontMetrics::for_style(style);
        let content = geometry.content_box;
        let block = layout_text(element, text, content.size(), &metrics);
        if block.shrunk {
            warn!(
                "Text in element '{}' shrunk from {}pt to {}pt to fit its box",
                element.id, style.font_size, block.font_size
            );
        }
        if block.lines.is_empty() {
            return Ok(());
        }

        let font = self.resources.font(metrics.font());
        let page_height = geometry.page.height;
        pen.scoped(|pen| {
            if style.overflow != TextOverflow::Visible {
                pen.rect(geometry.pdf_rect(content));
                pen.op("W", vec![]);
                pen.op("n", vec![]);
            }
            if let Some(shadow) = &style.text_shadow {
                let offset = Point::new(shadow.offset_x, shadow.offset_y);
                draw_runs(pen, &block, &font, content, page_height, offset, &shadow.color);
            }
            draw_runs(pen, &block, &font, content, page_height, Point::default(), &style.color);

            let decorations: Vec<_> = block.lines.iter().filter_map(|l| l.decoration.as_ref()).collect();
            if !decorations.is_empty() {
                pen.fill_color(&style.color);
                for deco in decorations {
                    let y = flip_y(content.y + deco.y, page_height) - deco.thickness / 2.0;
                    pen.rect(Rect::new(content.x + deco.x, y, deco.width, deco.thickness));
                }
                pen.op("f", vec![]);
            }
            Ok(())
        })
    }

    fn paint_qr(
        &mut self,
        pen: &mut Pen,
        element: &Element,
        payload: &str,
        geometry: &ElementGeometry,
    ) -> Result<(), RenderError> {
        let content = geometry.content_box;
        let side = content.width.min(content.height);
        if side <= 0.0 {
            return Ok(());
        }
        let square = geometry.pdf_rect(Rect::new(
            content.x + (content.width - side) / 2.0,
            content.y + (content.height - side) / 2.0,
            side,
            side,
        ));

        let request = QrRequest {
            url: payload.to_string(),
            preset: self.options.qr_preset.clone(),
            pixel_size: self.options.qr_pixel_size,
        };
        match self.qr.generate(&request) {
            Ok(QrImage::Svg(svg)) => match self.markup.convert(&svg) {
                Ok(graphic) => draw_vector(pen, &graphic, square),
                Err(e) => {
                    warn!("QR markup for element '{}' could not be converted: {}", element.id, e);
                    self.paint_placeholder(pen, square, QR_UNAVAILABLE_LABEL)
                }
            },
            Ok(QrImage::Modules(matrix)) => {
                draw_modules(pen, &matrix, &request, square);
                Ok(())
            }
            Err(e) => {
                warn!(
                    "QR generation via {} failed for element '{}': {}",
                    self.qr.name(),
                    element.id,
                    e
                );
                self.paint_placeholder(pen, square, QR_UNAVAILABLE_LABEL)
            }
        }
    }

    /// Dashed gray box with a centered label; `rect` in PDF coordinates.
    fn paint_placeholder(&mut self, pen: &mut Pen, rect: Rect, label: &str) -> Result<(), RenderError> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Ok(());
        }
        let font = self.resources.font(StandardFont::Helvetica);
        pen.scoped(|pen| {
            pen.fill_color(&PLACEHOLDER_FILL);
            pen.state.set_stroke(pen.ops, &PLACEHOLDER_STROKE);
            pen.state.set_line_width(pen.ops, 0.75);
            pen.state.set_dash(pen.ops, &[3.0, 2.0]);
            pen.rect(rect);
            pen.op("B", vec![]);
            pen.state.set_dash(pen.ops, &[]);

            let metrics = StandardFontMetrics::new(StandardFont::Helvetica);
            let mut size = (rect.height * 0.25).clamp(4.0, 10.0);
            let width = metrics.measure(label, size, 0.0);
            if width > rect.width * 0.9 && width > 0.0 {
                size *= rect.width * 0.9 / width;
            }
            let width = metrics.measure(label, size, 0.0);
            let x = rect.x + (rect.width - width) / 2.0;
            let y = rect.y + rect.height / 2.0 - size * 0.35;
            pen.op("BT", vec![]);
            pen.fill_color(&PLACEHOLDER_TEXT);
            pen.text(&font, size, x, y, label);
            pen.op("ET", vec![]);
            Ok(())
        })
    }
}

fn draw_runs(
    pen: &mut Pen,
    block: &TextBlockLayout,
    font: &str,
    content: Rect,
    page_height: f32,
    offset: Point,
    color: &Color,
) {
    pen.op("BT", vec![]);
    pen.fill_color(color);
    for line in &block.lines {
        let y = flip_y(content.y + line.baseline + offset.y, page_height);
        for run in &line.runs {
            pen.text(font, block.font_size, content.x + run.x + offset.x, y, &run.text);
        }
    }
    pen.op("ET", vec![]);
}

/// Maps the graphic's view box onto `square` (PDF coordinates) and fills
/// each path in its own color.
fn draw_vector(pen: &mut Pen, graphic: &VectorGraphic, square: Rect) -> Result<(), RenderError> {
    let vb = graphic.view_box;
    let sx = square.width / vb.width;
    let sy = square.height / vb.height;
    let top = square.y + square.height;
    pen.scoped(|pen| {
        pen.op(
            "cm",
            vec![
                sx.into(),
                0.into(),
                0.into(),
                (-sy).into(),
                (square.x - vb.x * sx).into(),
                (top + vb.y * sy).into(),
            ],
        );
        for path in &graphic.paths {
            pen.fill_color(&path.fill);
            for segment in &path.segments {
                match segment {
                    PathSegment::MoveTo(p) => pen.op("m", vec![p.x.into(), p.y.into()]),
                    PathSegment::LineTo(p) => pen.op("l", vec![p.x.into(), p.y.into()]),
                    PathSegment::Close => pen.op("h", vec![]),
                }
            }
            pen.op("f", vec![]);
        }
        Ok(())
    })
}

/// Background square in the preset's background color, then one rectangle
/// per horizontal run of dark modules.
fn draw_modules(pen: &mut Pen, matrix: &QrMatrix, request: &QrRequest, square: Rect) {
    let quiet = request.preset.quiet_zone as usize;
    let total = (matrix.width() + 2 * quiet) as f32;
    let module = square.width / total;
    let top = square.y + square.height;

    pen.fill_color(&request.preset.background);
    pen.rect(square);
    pen.op("f", vec![]);

    pen.fill_color(&request.preset.foreground);
    for row in 0..matrix.width() {
        let mut col = 0;
        while col < matrix.width() {
            if !matrix.is_dark(col, row) {
                col += 1;
                continue;
            }
            let start = col;
            while col < matrix.width() && matrix.is_dark(col, row) {
                col += 1;
            }
            pen.rect(Rect::new(
                square.x + (quiet + start) as f32 * module,
                top - (quiet + row + 1) as f32 * module,
                (col - start) as f32 * module,
                module,
            ));
        }
    }
    pen.op("f", vec![]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_model::{MissingFieldPolicy, PageType, Position, SemanticField, TextStyle};
    use placard_render_core::SvgMarkupConverter;
    use placard_traits::{QrError, UnavailableQrProvider};

    #[derive(Debug)]
    struct CheckerProvider;

    impl QrProvider for CheckerProvider {
        fn generate(&self, request: &QrRequest) -> Result<QrImage, QrError> {
            if request.url.is_empty() {
                return Err(QrError::EmptyPayload);
            }
            let modules = (0..9).map(|i| i % 2 == 0).collect();
            QrMatrix::new(3, modules)
                .map(QrImage::Modules)
                .ok_or_else(|| QrError::Encode("bad matrix".into()))
        }

        fn name(&self) -> &'static str {
            "checker"
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn paint_with(layout: &Layout, fields: &FieldValues, qr: &dyn QrProvider, options: &RenderOptions) -> Result<(Content, PageResources), RenderError> {
        init_logger();
        let mut resources = PageResources::default();
        let content = PagePainter {
            resources: &mut resources,
            qr,
            markup: &SvgMarkupConverter,
            options,
        }
        .paint(layout, fields)?;
        Ok((content, resources))
    }

    fn paint(layout: &Layout) -> Content {
        paint_with(layout, &FieldValues::new(), &CheckerProvider, &RenderOptions::default())
            .unwrap()
            .0
    }

    fn operators(content: &Content) -> Vec<&str> {
        content.operations.iter().map(|op| op.operator.as_str()).collect()
    }

    fn count(content: &Content, operator: &str) -> usize {
        operators(content).iter().filter(|op| **op == operator).count()
    }

    fn text_el(id: &str) -> Element {
        Element::new(ElementKind::Text, Position { x: 50.0, y: 50.0 })
            .with_id(id)
            .with_content("Hello")
    }

    fn strings(content: &Content) -> Vec<String> {
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first())
            .filter_map(|o| o.as_str().ok())
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect()
    }

    #[test]
    fn every_element_is_wrapped_in_balanced_state() {
        let layout = Layout::new(PageType::A6Portrait)
            .with_element(text_el("a"))
            .with_element(text_el("b"));
        let content = paint(&layout);
        assert_eq!(content.operations.first().map(|op| op.operator.as_str()), Some("q"));
        assert_eq!(count(&content, "q"), count(&content, "Q"));
        assert_eq!(strings(&content), vec!["Hello", "Hello"]);
    }

    #[test]
    fn rotation_and_opacity_stay_inside_their_element() {
        let mut rotated = text_el("rotated");
        rotated.rotation = 30.0;
        rotated.opacity = 0.4;
        let layout = Layout::new(PageType::A6Portrait)
            .with_element(rotated)
            .with_element(text_el("plain"));
        let content = paint(&layout);
        let ops = operators(&content);

        let mut depth = 0;
        let first_q_end = ops
            .iter()
            .position(|op| {
                match *op {
                    "q" => depth += 1,
                    "Q" => depth -= 1,
                    _ => {}
                }
                *op == "Q" && depth == 0
            })
            .unwrap();
        let cm = ops.iter().position(|op| *op == "cm").unwrap();
        assert!(cm < first_q_end);
        let gs: Vec<usize> = ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op == "gs")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(gs.len(), 2, "opacity is set and explicitly restored");
        assert!(gs.iter().all(|i| *i < first_q_end));
        assert_eq!(count(&content, "cm"), 1);
    }

    #[test]
    fn failed_qr_draws_a_placeholder() {
        let qr = Element::new(ElementKind::QrCode, Position { x: 50.0, y: 50.0 }).with_id("qr");
        let layout = Layout::new(PageType::Square).with_element(qr);
        let fields = FieldValues::new().with(SemanticField::QrUrl, "https://example.com");
        let (content, _) = paint_with(&layout, &fields, &UnavailableQrProvider, &RenderOptions::default()).unwrap();
        assert_eq!(strings(&content), vec![QR_UNAVAILABLE_LABEL]);
    }

    #[test]
    fn module_matrix_becomes_filled_runs() {
        let qr = Element::new(ElementKind::QrCode, Position { x: 50.0, y: 50.0 }).with_id("qr");
        let layout = Layout::new(PageType::Square).with_element(qr);
        let fields = FieldValues::new().with(SemanticField::QrUrl, "https://example.com");
        let (content, _) = paint_with(&layout, &fields, &CheckerProvider, &RenderOptions::default()).unwrap();
        // background square + 5 single-module runs
        assert_eq!(count(&content, "re"), 6);
        assert!(strings(&content).is_empty());
    }

    #[test]
    fn missing_field_fails_only_under_fail_policy() {
        let bound = text_el("name").bound_to(SemanticField::BusinessName);
        let layout = Layout::new(PageType::A6Portrait).with_element(bound);
        let preview = paint(&layout);
        assert_eq!(strings(&preview), vec!["Your Business Name"]);

        let options = RenderOptions::default().with_missing_fields(MissingFieldPolicy::Fail);
        let err = paint_with(&layout, &FieldValues::new(), &CheckerProvider, &options).unwrap_err();
        assert!(matches!(err, RenderError::MissingField { ref field, .. } if field == "business_name"));
    }

    #[test]
    fn dashed_border_resets_to_solid() {
        let style = BoxStyle {
            border_width: 2.0,
            border_style: BorderStyle::Dashed,
            ..Default::default()
        };
        let layout = Layout::new(PageType::A6Portrait).with_element(text_el("boxed").with_box_style(style));
        let content = paint(&layout);
        let dashes: Vec<&Operation> = content.operations.iter().filter(|op| op.operator == "d").collect();
        assert_eq!(dashes.len(), 2);
        assert_eq!(dashes[1].operands[0].as_array().unwrap().len(), 0);
    }

    #[test]
    fn shadow_is_drawn_before_the_text() {
        let style = TextStyle {
            text_shadow: Some(placard_model::TextShadow {
                offset_x: 1.0,
                offset_y: 1.0,
                color: Color::gray(128),
            }),
            ..Default::default()
        };
        let layout = Layout::new(PageType::A6Portrait).with_element(text_el("shadowed").with_text_style(style));
        let content = paint(&layout);
        assert_eq!(strings(&content), vec!["Hello", "Hello"]);
        assert_eq!(count(&content, "BT"), 2);
    }

    #[test]
    fn image_renders_labeled_placeholder() {
        let image = Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 }).with_content("Logo");
        let layout = Layout::new(PageType::A6Portrait).with_element(image);
        let (content, resources) =
            paint_with(&layout, &FieldValues::new(), &CheckerProvider, &RenderOptions::default()).unwrap();
        assert_eq!(strings(&content), vec!["Logo"]);
        assert!(resources.to_dictionary().get(b"Font").is_ok());
    }
}
