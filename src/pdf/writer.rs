//! Write side of the PDF codec.

use std::collections::HashMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::{OutputDocument, SourcePage, SourcePdf};
use crate::error::{Error, Result};
use crate::geometry::PageSize;

/// Value written to the `/Producer` info entry.
pub const PRODUCER: &str = concat!("a5kit ", env!("CARGO_PKG_VERSION"));

const OUTPUT_VERSION: &str = "1.5";

/// Builds an output PDF page by page.
///
/// Pages are created blank at a fixed size; content comes from an encoded
/// content stream plus the resources it names (imported source pages,
/// embedded images, fonts). Nothing is serialized until [`finish`].
///
/// [`finish`]: PdfWriter::finish
pub struct PdfWriter {
    doc: LopdfDocument,
    pages_id: ObjectId,
    kids: Vec<Object>,
    sizes: Vec<PageSize>,
    /// Source object id -> copied object id
    import_cache: HashMap<ObjectId, ObjectId>,
    /// Source page id -> form XObject id
    form_cache: HashMap<ObjectId, ObjectId>,
    fonts: HashMap<&'static str, ObjectId>,
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = LopdfDocument::with_version(OUTPUT_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            sizes: Vec::new(),
            import_cache: HashMap::new(),
            form_cache: HashMap::new(),
            fonts: HashMap::new(),
            title: None,
        }
    }

    /// Set the `/Title` info entry.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Import a source page as a Form XObject.
    ///
    /// The form's coordinate space is the source page space and its BBox the
    /// visible page box. Importing the same page again returns the same form;
    /// resources shared between pages are copied once.
    pub fn import_page(&mut self, source: &SourcePdf, page: &SourcePage) -> Result<ObjectId> {
        if let Some(&id) = self.form_cache.get(&page.id) {
            return Ok(id);
        }

        let content = source.page_content(page)?;
        let bbox = page.page_box();

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => Object::Integer(1),
            "BBox" => vec![
                Object::Real(bbox.x),
                Object::Real(bbox.y),
                Object::Real(bbox.right()),
                Object::Real(bbox.top()),
            ],
        };

        if let Some(resources) = source.page_resources(page) {
            let copied = self.copy_object_deep(source.raw_doc(), resources)?;
            dict.set("Resources", copied);
        }

        let id = self.doc.add_object(Stream::new(dict, content));
        self.form_cache.insert(page.id, id);
        log::debug!("Imported source page {} as form {:?}", page.number, id);
        Ok(id)
    }

    /// Embed an RGB bitmap as a Flate-compressed Image XObject.
    pub fn add_image(&mut self, image: &RgbImage) -> Result<ObjectId> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::Render("cannot embed an empty image".to_string()));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(image.as_raw())?;
        let data = encoder.finish()?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(width)),
            "Height" => Object::Integer(i64::from(height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "FlateDecode",
        };

        // Already compressed; keep `compress()` from touching it.
        Ok(self
            .doc
            .add_object(Stream::new(dict, data).with_compression(false)))
    }

    /// A standard-14 Type1 font with WinAnsi encoding, added once per name.
    pub fn font(&mut self, base_font: &'static str) -> ObjectId {
        if let Some(&id) = self.fonts.get(base_font) {
            return id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
        self.fonts.insert(base_font, id);
        id
    }

    /// Append a page of the given size.
    pub fn add_page(
        &mut self,
        size: PageSize,
        content: Content,
        resources: Dictionary,
    ) -> Result<ObjectId> {
        if !size.is_valid() {
            return Err(Error::Render(format!(
                "invalid page size {} x {}",
                size.width, size.height
            )));
        }

        let data = content.encode().map_err(codec_error)?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), data));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(size.width),
                Object::Real(size.height),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });

        self.kids.push(Object::Reference(page_id));
        self.sizes.push(size);
        Ok(page_id)
    }

    /// Build the page tree, catalog and info dictionary, then serialize.
    pub fn finish(mut self) -> Result<OutputDocument> {
        if self.kids.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => std::mem::take(&mut self.kids),
                "Count" => Object::Integer(count),
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(pdf_date(chrono::Local::now())),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        let info_id = self.doc.add_object(info);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();

        let mut data = Vec::new();
        self.doc.save_to(&mut data).map_err(|e| codec_error(lopdf::Error::IO(e)))?;

        Ok(OutputDocument::new(self.sizes, data))
    }

    /// Deep copy `obj` from `source`, following references.
    ///
    /// The target id is reserved before recursing so reference cycles
    /// terminate. `/Parent` links are dropped to avoid pulling in the source
    /// page tree.
    fn copy_object_deep(&mut self, source: &LopdfDocument, obj: &Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => {
                if let Some(&new_id) = self.import_cache.get(id) {
                    return Ok(Object::Reference(new_id));
                }
                let new_id = self.doc.new_object_id();
                self.import_cache.insert(*id, new_id);

                let copied = match source.get_object(*id) {
                    Ok(referenced) => self.copy_object_deep(source, referenced)?,
                    Err(_) => Object::Null,
                };
                self.doc.objects.insert(new_id, copied);
                Ok(Object::Reference(new_id))
            }
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dictionary(source, dict)?)),
            Object::Array(arr) => {
                let mut new_arr = Vec::with_capacity(arr.len());
                for item in arr {
                    new_arr.push(self.copy_object_deep(source, item)?);
                }
                Ok(Object::Array(new_arr))
            }
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(source, &stream.dict)?;
                Ok(Object::Stream(
                    Stream::new(dict, stream.content.clone())
                        .with_compression(stream.allows_compression),
                ))
            }
            _ => Ok(obj.clone()),
        }
    }

    fn copy_dictionary(&mut self, source: &LopdfDocument, dict: &Dictionary) -> Result<Dictionary> {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            new_dict.set(key.clone(), self.copy_object_deep(source, value)?);
        }
        Ok(new_dict)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a timestamp as a PDF date string: `D:YYYYMMDDHHmmSS+HH'mm'`.
pub fn pdf_date<Tz: chrono::TimeZone>(time: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let offset = time.format("%z").to_string();
    let (hours, minutes) = offset.split_at(offset.len().min(3));
    format!("D:{}{}'{}'", time.format("%Y%m%d%H%M%S"), hours, minutes)
}

/// Encode a text string: PDFDocEncoding-compatible ASCII as is, anything
/// else as UTF-16BE with a byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}

/// Failures while serializing output are codec failures, not parse errors.
fn codec_error(err: lopdf::Error) -> Error {
    Error::Render(err.to_string())
}
