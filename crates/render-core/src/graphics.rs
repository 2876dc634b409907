//! Explicit graphics state tracking for content stream generation.
//!
//! Every element is painted inside its own `q … Q` pair. The stack mirrors
//! what the PDF viewer will hold so redundant color/width operators can be
//! skipped, and so a pop always restores exactly what the push saved.

use crate::error::RenderError;
use lopdf::Object;
use lopdf::content::Operation;
use placard_types::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f32,
    pub dash: Vec<f32>,
    pub opacity: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct GraphicsStateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

fn rgb_operands(color: &Color) -> Vec<Object> {
    color.to_unit_rgb().into_iter().map(Object::from).collect()
}

impl GraphicsStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self, ops: &mut Vec<Operation>) {
        ops.push(Operation::new("q", vec![]));
        self.saved.push(self.current.clone());
    }

    pub fn pop(&mut self, ops: &mut Vec<Operation>) -> Result<(), RenderError> {
        let restored = self.saved.pop().ok_or(RenderError::StateUnderflow)?;
        ops.push(Operation::new("Q", vec![]));
        self.current = restored;
        Ok(())
    }

    /// Runs `draw` between a push and a pop. The pop happens even when
    /// `draw` fails; the draw error wins over a pop error.
    pub fn scoped<T, F>(&mut self, ops: &mut Vec<Operation>, draw: F) -> Result<T, RenderError>
    where
        F: FnOnce(&mut Self, &mut Vec<Operation>) -> Result<T, RenderError>,
    {
        self.push(ops);
        let result = draw(self, ops);
        let popped = self.pop(ops);
        let value = result?;
        popped?;
        Ok(value)
    }

    pub fn set_fill(&mut self, ops: &mut Vec<Operation>, color: &Color) {
        if self.current.fill != *color {
            ops.push(Operation::new("rg", rgb_operands(color)));
            self.current.fill = color.clone();
        }
    }

    pub fn set_stroke(&mut self, ops: &mut Vec<Operation>, color: &Color) {
        if self.current.stroke != *color {
            ops.push(Operation::new("RG", rgb_operands(color)));
            self.current.stroke = color.clone();
        }
    }

    pub fn set_line_width(&mut self, ops: &mut Vec<Operation>, width: f32) {
        if self.current.line_width != width {
            ops.push(Operation::new("w", vec![width.into()]));
            self.current.line_width = width;
        }
    }

    /// An empty pattern means a solid line.
    pub fn set_dash(&mut self, ops: &mut Vec<Operation>, pattern: &[f32]) {
        if self.current.dash != pattern {
            let array: Vec<Object> = pattern.iter().map(|v| Object::from(*v)).collect();
            ops.push(Operation::new("d", vec![array.into(), 0.into()]));
            self.current.dash = pattern.to_vec();
        }
    }

    /// Selects the ExtGState resource `resource` whose constant alpha is `alpha`.
    pub fn set_opacity(&mut self, ops: &mut Vec<Operation>, resource: &str, alpha: f32) {
        if self.current.opacity != alpha {
            ops.push(Operation::new("gs", vec![Object::Name(resource.as_bytes().to_vec())]));
            self.current.opacity = alpha;
        }
    }
}
