//! Read side of the PDF codec: source documents and their pages.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use tempfile::NamedTempFile;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::geometry::{Matrix, PageSize, Rect};

/// Guard against malformed `/Parent` cycles.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A loaded source PDF.
///
/// Owns the parsed object graph plus the original bytes, which external
/// renderers read from a temporary file created on first use and removed
/// when the `SourcePdf` is dropped.
pub struct SourcePdf {
    doc: LopdfDocument,
    data: Vec<u8>,
    pages: BTreeMap<u32, ObjectId>,
    materialized: OnceCell<NamedTempFile>,
}

impl SourcePdf {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect_format_from_bytes(&data)?;

        let doc = LopdfDocument::load_mem(&data)?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let pages = doc.get_pages();
        Ok(Self {
            doc,
            data,
            pages,
            materialized: OnceCell::new(),
        })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Look up one page (1-indexed).
    pub fn page(&self, number: u32) -> Result<SourcePage> {
        let id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.page_count()))?;

        let media_box = self
            .inherited(id, b"MediaBox")
            .and_then(|obj| self.parse_box(obj))
            .filter(|r| r.width > 0.0 && r.height > 0.0)
            .unwrap_or_else(|| {
                log::warn!("Page {} has no usable MediaBox, assuming Letter", number);
                Rect::new(0.0, 0.0, PageSize::LETTER.width, PageSize::LETTER.height)
            });

        let crop_box = self
            .inherited(id, b"CropBox")
            .and_then(|obj| self.parse_box(obj));

        let rotation = self
            .inherited(id, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|r| normalize_rotation(number, r))
            .unwrap_or(0);

        Ok(SourcePage {
            number,
            id,
            media_box,
            crop_box,
            rotation,
        })
    }

    /// All pages in document order.
    pub fn pages(&self) -> Result<Vec<SourcePage>> {
        self.pages.keys().map(|&n| self.page(n)).collect()
    }

    /// Concatenated, decompressed content streams of a page.
    pub fn page_content(&self, page: &SourcePage) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page.id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };

        let refs: Vec<&Object> = match contents {
            Object::Array(arr) => arr.iter().collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in refs {
            let stream = match self.resolve(obj).and_then(|o| o.as_stream().ok()) {
                Some(s) => s,
                None => continue,
            };
            // lopdf reports an error for unfiltered streams too.
            if stream.dict.has(b"Filter") {
                let data = stream.decompressed_content().map_err(|e| {
                    Error::Render(format!(
                        "page {}: cannot decode content stream: {}",
                        page.number, e
                    ))
                })?;
                content.extend_from_slice(&data);
            } else {
                content.extend_from_slice(&stream.content);
            }
            content.push(b'\n');
        }
        Ok(content)
    }

    /// Resources dictionary in effect for a page (possibly inherited).
    pub fn page_resources(&self, page: &SourcePage) -> Option<&Object> {
        self.inherited(page.id, b"Resources")
    }

    /// Path of a file holding the original bytes, for external renderers.
    ///
    /// Written once per document; removed when `self` is dropped.
    pub fn materialize(&self) -> Result<&Path> {
        if let Some(file) = self.materialized.get() {
            return Ok(file.path());
        }
        let mut file = tempfile::Builder::new()
            .prefix("a5kit-src-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&self.data)?;
        file.flush()?;
        Ok(self.materialized.get_or_init(|| file).path())
    }

    /// Follow a reference one level.
    pub(crate) fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    /// Look up a page attribute, walking up the `/Parent` chain.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = current.get(key) {
                return self.resolve(value);
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn parse_box(&self, obj: &Object) -> Option<Rect> {
        let arr = obj.as_array().ok()?;
        if arr.len() < 4 {
            return None;
        }
        let mut v = [0.0f32; 4];
        for (slot, item) in v.iter_mut().zip(arr.iter()) {
            *slot = self.resolve(item)?.as_float().ok()?;
        }
        Some(Rect::from_corners(v[0], v[1], v[2], v[3]))
    }
}

fn normalize_rotation(page: u32, rotate: i64) -> u16 {
    let r = rotate.rem_euclid(360);
    if r % 90 != 0 {
        log::warn!(
            "Page {} has invalid /Rotate {}, treating as unrotated",
            page,
            rotate
        );
        return 0;
    }
    r as u16
}

/// Geometry of one source page.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePage {
    /// 1-indexed page number
    pub number: u32,
    /// Page object id in the source document
    pub id: ObjectId,
    /// Media box in page space
    pub media_box: Rect,
    /// Crop box in page space, if any
    pub crop_box: Option<Rect>,
    /// Clockwise display rotation: 0, 90, 180 or 270
    pub rotation: u16,
}

impl SourcePage {
    /// Visible page box: the crop box clipped to the media box, else the media box.
    pub fn page_box(&self) -> Rect {
        self.crop_box
            .and_then(|crop| crop.intersect(&self.media_box))
            .unwrap_or(self.media_box)
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation != 0
    }

    /// Size of the page box in page space (rotation not applied).
    pub fn box_size(&self) -> PageSize {
        let b = self.page_box();
        PageSize::new(b.width, b.height)
    }

    /// Size as a viewer displays the page (rotation applied).
    pub fn display_size(&self) -> PageSize {
        match self.rotation {
            90 | 270 => self.box_size().swapped(),
            _ => self.box_size(),
        }
    }

    /// Map page space to display space, with the visible box's lower-left
    /// corner at the origin.
    pub fn display_matrix(&self) -> Matrix {
        let b = self.page_box();
        let (x0, y0, w, h) = (b.x, b.y, b.width, b.height);
        match self.rotation {
            90 => Matrix::new(0.0, -1.0, 1.0, 0.0, -y0, w + x0),
            180 => Matrix::new(-1.0, 0.0, 0.0, -1.0, w + x0, h + y0),
            270 => Matrix::new(0.0, 1.0, -1.0, 0.0, h + y0, -x0),
            _ => Matrix::translate(-x0, -y0),
        }
    }

    /// The same page with rotation disregarded.
    pub fn unrotated(&self) -> SourcePage {
        SourcePage {
            rotation: 0,
            ..self.clone()
        }
    }
}
