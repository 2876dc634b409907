use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Seek, Write};

const RESOURCES_ID: ObjectId = (1, 0);
const PAGES_ID: ObjectId = (2, 0);
const CATALOG_ID: ObjectId = (3, 0);

/// Writes a PDF front to back. Content streams go straight to the output as
/// they are produced; the small structural objects (resources, pages,
/// catalog, info) are held back until [`StreamingPdfWriter::finish`].
pub struct StreamingPdfWriter<W: Write + Seek> {
    out: W,
    /// Byte offset of every written object, indexed by object number.
    offsets: BTreeMap<u32, u64>,
    max_id: u32,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    info: Dictionary,
    pending: BTreeMap<ObjectId, Object>,
}

impl<W: Write + Seek> StreamingPdfWriter<W> {
    pub fn new(mut out: W, version: &str) -> io::Result<Self> {
        writeln!(out, "%PDF-{}", version)?;
        out.write_all(b"%\xe2\xe3\xcf\xd3\n")?;
        let mut pending = BTreeMap::new();
        pending.insert(RESOURCES_ID, Dictionary::new().into());
        Ok(Self {
            out,
            offsets: BTreeMap::new(),
            max_id: CATALOG_ID.0,
            pages_id: PAGES_ID,
            resources_id: RESOURCES_ID,
            page_ids: Vec::new(),
            info: dictionary! { "Producer" => Object::string_literal("placard") },
            pending,
        })
    }

    fn next_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    /// Holds `object` back until the document is finished.
    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.next_id();
        self.pending.insert(id, object);
        id
    }

    pub fn write_content_stream(&mut self, content: Content) -> io::Result<ObjectId> {
        let bytes = content
            .encode()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let id = self.next_id();
        self.emit(id, &Object::Stream(Stream::new(dictionary! {}, bytes)))?;
        Ok(id)
    }

    /// Replaces the shared page resource dictionary.
    pub fn set_resources(&mut self, resources: Dictionary) {
        self.pending.insert(RESOURCES_ID, resources.into());
    }

    pub fn set_page_ids(&mut self, page_ids: Vec<ObjectId>) {
        self.page_ids = page_ids;
    }

    pub fn set_title(&mut self, title: &str, encode: impl Fn(&str) -> Vec<u8>) {
        self.info.set("Title", Object::String(encode(title), StringFormat::Literal));
    }

    pub fn finish(mut self) -> io::Result<W> {
        let kids: Vec<Object> = self.page_ids.iter().copied().map(Object::Reference).collect();
        let count = kids.len() as i64;
        self.pending.insert(
            PAGES_ID,
            dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => count }.into(),
        );
        self.pending
            .insert(CATALOG_ID, dictionary! { "Type" => "Catalog", "Pages" => PAGES_ID }.into());
        let info = std::mem::take(&mut self.info);
        let info_id = self.buffer_object(info.into());

        for (id, object) in std::mem::take(&mut self.pending) {
            self.emit(id, &object)?;
        }

        let xref_start = self.out.stream_position()?;
        let size = self.max_id + 1;
        self.write_xref(size)?;
        writeln!(self.out, "trailer")?;
        serialize(
            &mut self.out,
            &dictionary! { "Size" => size as i64, "Root" => CATALOG_ID, "Info" => info_id }.into(),
        )?;
        write!(self.out, "\nstartxref\n{}\n%%EOF", xref_start)?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, id: ObjectId, object: &Object) -> io::Result<()> {
        self.offsets.insert(id.0, self.out.stream_position()?);
        writeln!(self.out, "{} {} obj", id.0, id.1)?;
        serialize(&mut self.out, object)?;
        write!(self.out, "\nendobj\n")
    }

    /// A single subsection; numbers that were allocated but never written
    /// are listed as free.
    fn write_xref(&mut self, size: u32) -> io::Result<()> {
        write!(self.out, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for number in 1..size {
            match self.offsets.get(&number) {
                Some(offset) => write!(self.out, "{:010} 00000 n \n", offset)?,
                None => write!(self.out, "0000000000 00000 f \n")?,
            }
        }
        Ok(())
    }
}

/// Serializes the object kinds a placard page is made of: names, numbers,
/// literal strings, arrays, dictionaries, references and streams.
fn serialize(out: &mut dyn Write, object: &Object) -> io::Result<()> {
    match object {
        Object::Integer(i) => write!(out, "{}", i),
        Object::Real(r) => write!(out, "{}", format_real(*r)),
        Object::Name(name) => {
            out.write_all(b"/")?;
            out.write_all(name)
        }
        Object::String(bytes, StringFormat::Literal) => {
            let mut escaped = Vec::with_capacity(bytes.len() + 2);
            escaped.push(b'(');
            for &byte in bytes {
                match byte {
                    b'(' | b')' | b'\\' => escaped.extend_from_slice(&[b'\\', byte]),
                    b'\n' => escaped.extend_from_slice(b"\\n"),
                    b'\r' => escaped.extend_from_slice(b"\\r"),
                    _ => escaped.push(byte),
                }
            }
            escaped.push(b')');
            out.write_all(&escaped)
        }
        Object::Array(items) => {
            out.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_all(b" ")?;
                }
                serialize(out, item)?;
            }
            out.write_all(b"]")
        }
        Object::Dictionary(dict) => serialize_dictionary(out, dict),
        Object::Stream(stream) => {
            let mut dict = stream.dict.clone();
            dict.set("Length", stream.content.len() as i64);
            serialize_dictionary(out, &dict)?;
            out.write_all(b"\nstream\n")?;
            out.write_all(&stream.content)?;
            out.write_all(b"\nendstream")
        }
        Object::Reference(id) => write!(out, "{} {} R", id.0, id.1),
        Object::Null | Object::Boolean(_) | Object::String(_, StringFormat::Hexadecimal) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported PDF object: {:?}", object),
        )),
    }
}

fn serialize_dictionary(out: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
    out.write_all(b"<<")?;
    for (key, value) in dict.iter() {
        out.write_all(b"/")?;
        out.write_all(key)?;
        out.write_all(b" ")?;
        serialize(out, value)?;
        out.write_all(b" ")?;
    }
    out.write_all(b">>")
}

/// Up to three decimals without trailing zeros, e.g. `297.638` or `0.4`.
fn format_real(value: f32) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-" | "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}
