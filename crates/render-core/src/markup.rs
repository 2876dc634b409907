//! Conversion of externally produced vector markup into drawable paths.

use crate::error::RenderError;
use log::debug;
use placard_types::{Color, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// A filled outline in the graphic's own coordinate space (y down).
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPath {
    pub fill: Color,
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorGraphic {
    pub view_box: Rect,
    pub paths: Vec<VectorPath>,
}

/// Turns a markup document into paths the document renderer can fill.
pub trait MarkupConverter: Send + Sync {
    fn convert(&self, markup: &str) -> Result<VectorGraphic, RenderError>;
}

/// Reads the subset of SVG that QR generators emit: a root `<svg>` with a
/// `viewBox` (or `width`/`height`), `<rect>` elements and `<path>` elements
/// made of straight segments.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgMarkupConverter;

impl MarkupConverter for SvgMarkupConverter {
    fn convert(&self, markup: &str) -> Result<VectorGraphic, RenderError> {
        let doc = roxmltree::Document::parse(markup).map_err(|e| RenderError::Markup(e.to_string()))?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(RenderError::Markup(format!(
                "expected <svg> root, found <{}>",
                root.tag_name().name()
            )));
        }
        let view_box = parse_view_box(&root)?;

        let mut paths = Vec::new();
        for node in root.descendants().filter(|n| n.is_element()) {
            let Some(fill) = inherited_fill(&node) else {
                continue;
            };
            let segments = match node.tag_name().name() {
                "rect" => rect_segments(&node)?,
                "path" => parse_path_data(node.attribute("d").unwrap_or_default())?,
                _ => continue,
            };
            if !segments.is_empty() {
                paths.push(VectorPath { fill, segments });
            }
        }
        debug!("Converted SVG markup into {} path(s)", paths.len());
        Ok(VectorGraphic { view_box, paths })
    }
}

fn number(node: &roxmltree::Node, name: &str) -> Result<f32, RenderError> {
    match node.attribute(name) {
        None => Ok(0.0),
        Some(raw) => raw
            .trim()
            .trim_end_matches("px")
            .parse::<f32>()
            .map_err(|_| RenderError::Markup(format!("invalid {} attribute: {}", name, raw))),
    }
}

fn parse_view_box(root: &roxmltree::Node) -> Result<Rect, RenderError> {
    if let Some(raw) = root.attribute("viewBox") {
        let values: Vec<f32> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|_| RenderError::Markup(format!("invalid viewBox: {}", raw)))?;
        if let [x, y, w, h] = values[..]
            && w > 0.0
            && h > 0.0
        {
            return Ok(Rect::new(x, y, w, h));
        }
        return Err(RenderError::Markup(format!("invalid viewBox: {}", raw)));
    }
    let width = number(root, "width")?;
    let height = number(root, "height")?;
    if width > 0.0 && height > 0.0 {
        Ok(Rect::new(0.0, 0.0, width, height))
    } else {
        Err(RenderError::Markup("svg has neither viewBox nor size".into()))
    }
}

/// `None` when the fill is `none`. Unparseable colors fall back to black.
fn inherited_fill(node: &roxmltree::Node) -> Option<Color> {
    let raw = node.ancestors().find_map(|n| n.attribute("fill")).unwrap_or("#000000");
    if raw.trim() == "none" {
        return None;
    }
    Some(match raw.trim() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        other => Color::parse(other).unwrap_or(Color::BLACK),
    })
}

fn rect_segments(node: &roxmltree::Node) -> Result<Vec<PathSegment>, RenderError> {
    let (x, y) = (number(node, "x")?, number(node, "y")?);
    let (w, h) = (number(node, "width")?, number(node, "height")?);
    if w <= 0.0 || h <= 0.0 {
        return Ok(Vec::new());
    }
    Ok(vec![
        PathSegment::MoveTo(Point::new(x, y)),
        PathSegment::LineTo(Point::new(x + w, y)),
        PathSegment::LineTo(Point::new(x + w, y + h)),
        PathSegment::LineTo(Point::new(x, y + h)),
        PathSegment::Close,
    ])
}

enum Token {
    Command(char),
    Number(f32),
}

fn tokenize(data: &str) -> Result<Vec<Token>, RenderError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = data.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == ',' {
            i += 1;
        } else if c.is_ascii_alphabetic() {
            tokens.push(Token::Command(c));
            i += 1;
        } else {
            let start = i;
            if chars[i] == '+' || chars[i] == '-' {
                i += 1;
            }
            let mut seen_dot = false;
            while i < chars.len() {
                match chars[i] {
                    '0'..='9' => i += 1,
                    '.' if !seen_dot => {
                        seen_dot = true;
                        i += 1;
                    }
                    'e' | 'E' => {
                        i += 1;
                        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
                            i += 1;
                        }
                    }
                    _ => break,
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f32>()
                .map_err(|_| RenderError::Markup(format!("invalid number in path data: '{}'", text)))?;
            tokens.push(Token::Number(value));
        }
    }
    Ok(tokens)
}

/// Parses `M m L l H h V v Z z`. Extra coordinate pairs after a move are
/// treated as line-tos, as SVG requires.
pub fn parse_path_data(data: &str) -> Result<Vec<PathSegment>, RenderError> {
    let tokens = tokenize(data)?;
    let mut segments = Vec::new();
    let mut current = Point::default();
    let mut subpath_start = Point::default();
    let mut command: Option<char> = None;
    let mut i = 0;

    let take = |i: &mut usize| -> Result<f32, RenderError> {
        match tokens.get(*i) {
            Some(Token::Number(v)) => {
                *i += 1;
                Ok(*v)
            }
            _ => Err(RenderError::Markup("path command is missing a coordinate".into())),
        }
    };

    while i < tokens.len() {
        if let Token::Command(c) = tokens[i] {
            command = Some(c);
            i += 1;
            if matches!(c, 'Z' | 'z') {
                segments.push(PathSegment::Close);
                current = subpath_start;
                continue;
            }
        }
        let Some(cmd) = command else {
            return Err(RenderError::Markup("path data must start with a command".into()));
        };
        match cmd {
            'M' | 'm' => {
                let (x, y) = (take(&mut i)?, take(&mut i)?);
                current = if cmd == 'm' {
                    Point::new(current.x + x, current.y + y)
                } else {
                    Point::new(x, y)
                };
                subpath_start = current;
                segments.push(PathSegment::MoveTo(current));
                command = Some(if cmd == 'm' { 'l' } else { 'L' });
            }
            'L' | 'l' => {
                let (x, y) = (take(&mut i)?, take(&mut i)?);
                current = if cmd == 'l' {
                    Point::new(current.x + x, current.y + y)
                } else {
                    Point::new(x, y)
                };
                segments.push(PathSegment::LineTo(current));
            }
            'H' | 'h' => {
                let x = take(&mut i)?;
                current.x = if cmd == 'h' { current.x + x } else { x };
                segments.push(PathSegment::LineTo(current));
            }
            'V' | 'v' => {
                let y = take(&mut i)?;
                current.y = if cmd == 'v' { current.y + y } else { y };
                segments.push(PathSegment::LineTo(current));
            }
            'Z' | 'z' => {
                return Err(RenderError::Markup("unexpected coordinate after close".into()));
            }
            other => {
                return Err(RenderError::Markup(format!("unsupported path command '{}'", other)));
            }
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relative_and_absolute_commands() {
        let segments = parse_path_data("M4 4h1v1H4z m2,0 l1 0 0 1").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::MoveTo(Point::new(4.0, 4.0)),
                PathSegment::LineTo(Point::new(5.0, 4.0)),
                PathSegment::LineTo(Point::new(5.0, 5.0)),
                PathSegment::LineTo(Point::new(4.0, 5.0)),
                PathSegment::Close,
                PathSegment::MoveTo(Point::new(6.0, 4.0)),
                PathSegment::LineTo(Point::new(7.0, 4.0)),
                PathSegment::LineTo(Point::new(7.0, 5.0)),
            ]
        );
    }

    #[test]
    fn handles_packed_signed_numbers() {
        let segments = parse_path_data("M1-2L-3.5.5").unwrap();
        assert_eq!(segments[0], PathSegment::MoveTo(Point::new(1.0, -2.0)));
        assert_eq!(segments[1], PathSegment::LineTo(Point::new(-3.5, 0.5)));
    }

    #[test]
    fn rejects_curves() {
        assert!(matches!(
            parse_path_data("M0 0 C1 1 2 2 3 3"),
            Err(RenderError::Markup(_))
        ));
    }

    #[test]
    fn converts_qr_style_svg() {
        let svg = r##"<?xml version="1.0" standalone="yes"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="29" height="29" viewBox="0 0 29 29">
  <rect x="0" y="0" width="29" height="29" fill="#fff"/>
  <path fill="#000" d="M4 4h7v1H4zM4 5h1v1H4z"/>
  <g fill="none"><path d="M0 0h1v1H0z"/></g>
</svg>"##;
        let graphic = SvgMarkupConverter.convert(svg).unwrap();
        assert_eq!(graphic.view_box, Rect::new(0.0, 0.0, 29.0, 29.0));
        assert_eq!(graphic.paths.len(), 2);
        assert_eq!(graphic.paths[0].fill, Color::WHITE);
        assert_eq!(graphic.paths[1].fill, Color::BLACK);
        assert_eq!(graphic.paths[1].segments.len(), 10);
    }

    #[test]
    fn rejects_non_svg_markup() {
        assert!(SvgMarkupConverter.convert("<html/>").is_err());
        assert!(SvgMarkupConverter.convert("not xml").is_err());
    }
}
