use crate::painter::PagePainter;
use crate::resources::PageResources;
use crate::writer::StreamingPdfWriter;
use log::{debug, info};
use lopdf::{Object, ObjectId, dictionary};
use placard_model::{FieldValues, Layout};
use placard_render_core::utils::to_win_ansi;
use placard_render_core::{DocumentRenderer, MarkupConverter, RenderError, RenderOptions, SvgMarkupConverter};
use placard_traits::QrProvider;
use placard_types::mm_to_pt;
use std::io::{Cursor, Seek, Write};
use std::sync::Arc;

/// A PDF renderer using the `lopdf` library, streaming content as pages are painted.
pub struct LopdfRenderer<W: Write + Seek + Send> {
    writer: Option<StreamingPdfWriter<W>>,
    resources: PageResources,
    qr: Arc<dyn QrProvider>,
    markup: Box<dyn MarkupConverter>,
}

impl<W: Write + Seek + Send> LopdfRenderer<W> {
    pub fn new(qr: Arc<dyn QrProvider>) -> Self {
        Self {
            writer: None,
            resources: PageResources::default(),
            qr,
            markup: Box::new(SvgMarkupConverter),
        }
    }

    pub fn with_markup_converter(mut self, markup: Box<dyn MarkupConverter>) -> Self {
        self.markup = markup;
        self
    }

    fn writer_mut(&mut self) -> Result<&mut StreamingPdfWriter<W>, RenderError> {
        self.writer
            .as_mut()
            .ok_or_else(|| RenderError::Other("Document not started".into()))
    }
}

impl<W: Write + Seek + Send> DocumentRenderer<W> for LopdfRenderer<W> {
    fn begin_document(&mut self, writer: W) -> Result<(), RenderError> {
        self.writer = Some(StreamingPdfWriter::new(writer, "1.7")?);
        Ok(())
    }

    fn render_page_content(
        &mut self,
        layout: &Layout,
        fields: &FieldValues,
        options: &RenderOptions,
    ) -> Result<ObjectId, RenderError> {
        let content = PagePainter {
            resources: &mut self.resources,
            qr: self.qr.as_ref(),
            markup: self.markup.as_ref(),
            options,
        }
        .paint(layout, fields)?;

        let writer = self.writer_mut()?;
        if let Some(title) = &options.title {
            writer.set_title(title, to_win_ansi);
        }
        let content_id = writer.write_content_stream(content)?;
        Ok(content_id)
    }

    fn write_page_object(
        &mut self,
        content_stream_ids: Vec<ObjectId>,
        page_width: f32,
        page_height: f32,
    ) -> Result<ObjectId, RenderError> {
        let writer = self.writer_mut()?;
        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
            "Contents" => Object::Array(content_stream_ids.into_iter().map(Object::Reference).collect()),
            "Resources" => writer.resources_id,
        };
        let page_id = writer.buffer_object(page_dict.into());
        Ok(page_id)
    }

    fn finish(self: Box<Self>, page_ids: Vec<ObjectId>) -> Result<W, RenderError> {
        let mut renderer = *self;
        let Some(mut writer) = renderer.writer.take() else {
            return Err(RenderError::Other(
                "Document was never started with begin_document".into(),
            ));
        };
        writer.set_resources(renderer.resources.to_dictionary());
        writer.set_page_ids(page_ids);
        Ok(writer.finish()?)
    }
}

/// Renders `layout` as a one-page PDF held in memory.
pub fn render_pdf(
    layout: &Layout,
    fields: &FieldValues,
    qr: Arc<dyn QrProvider>,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    layout.validate()?;
    let page_mm = layout.page_type.dimensions_mm();
    let (width, height) = (mm_to_pt(page_mm.width), mm_to_pt(page_mm.height));
    debug!(
        "Rendering {} element(s) on {} ({:.1}x{:.1}pt)",
        layout.elements.len(),
        layout.page_type.name(),
        width,
        height
    );

    let mut renderer: Box<dyn DocumentRenderer<Cursor<Vec<u8>>>> = Box::new(LopdfRenderer::new(qr));
    renderer.begin_document(Cursor::new(Vec::new()))?;
    let content_id = renderer.render_page_content(layout, fields, options)?;
    let page_id = renderer.write_page_object(vec![content_id], width, height)?;
    let bytes = renderer.finish(vec![page_id])?.into_inner();
    info!("Rendered PDF of {} bytes", bytes.len());
    Ok(bytes)
}
