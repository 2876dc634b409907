use crate::error::RenderError;
use crate::options::RenderOptions;
use lopdf::ObjectId;
use placard_model::{FieldValues, Layout};
use std::io::{Seek, Write};

/// A trait for document renderers, abstracting the PDF-writing primitives.
pub trait DocumentRenderer<W: Write + Seek + Send> {
    fn begin_document(&mut self, writer: W) -> Result<(), RenderError>;

    /// Paints every element of `layout` in z-order into one content stream.
    fn render_page_content(
        &mut self,
        layout: &Layout,
        fields: &FieldValues,
        options: &RenderOptions,
    ) -> Result<ObjectId, RenderError>;

    fn write_page_object(
        &mut self,
        content_stream_ids: Vec<ObjectId>,
        page_width: f32,
        page_height: f32,
    ) -> Result<ObjectId, RenderError>;

    fn finish(self: Box<Self>, page_ids: Vec<ObjectId>) -> Result<W, RenderError>;
}
