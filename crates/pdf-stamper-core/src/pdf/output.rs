use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// PDF version written for merged documents.
const OUTPUT_VERSION: &str = "1.7";

/// US Letter, used when a page carries no MediaBox at all.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Width and height of a page in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// The document being assembled.
///
/// Starts with an empty page tree. Pages can only be appended, so the
/// relative order of appended pages never changes.
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Pages whose original content is already isolated in `q … Q`
    wrapped: HashSet<ObjectId>,
}

impl OutputDocument {
    /// Create an empty document: a catalog pointing at a page tree with no kids.
    pub fn new() -> Self {
        let mut doc = Document::with_version(OUTPUT_VERSION);
        let pages_id = doc.new_object_id();

        let pages = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(Vec::new())),
            ("Count", Object::Integer(0)),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            wrapped: HashSet::new(),
        }
    }

    /// Append already-copied pages to the end of the page tree.
    pub fn append_pages(&mut self, page_ids: &[ObjectId]) -> Result<()> {
        for &page_id in page_ids {
            let page = self
                .doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| {
                    Error::PdfCopy(format!("page object {page_id:?} is not in the output: {e}"))
                })?;
            page.set("Parent", Object::Reference(self.pages_id));
        }

        self.page_ids.extend_from_slice(page_ids);

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();
        #[allow(clippy::cast_possible_wrap)] // Page counts are far below i64::MAX
        let count = self.page_ids.len() as i64;

        let pages = self
            .doc
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| Error::PdfCopy(format!("output page tree is missing: {e}")))?;
        pages.set("Kids", Object::Array(kids));
        pages.set("Count", Object::Integer(count));

        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page ids in output order
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// 1-based position of a page in the output, if it has been appended.
    pub fn page_number(&self, page_id: ObjectId) -> Option<usize> {
        self.page_ids.iter().position(|&id| id == page_id).map(|i| i + 1)
    }

    /// Size of a page from its MediaBox.
    ///
    /// Copied pages carry their own MediaBox; anything without one is
    /// treated as US Letter.
    pub fn page_size(&self, page_id: ObjectId) -> Result<PageSize> {
        let page = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Draw {
                page: self.page_number(page_id).unwrap_or(0),
                reason: format!("page object is missing: {e}"),
            })?;

        let [x0, y0, x1, y1] = media_box(&self.doc, page).unwrap_or(DEFAULT_MEDIA_BOX);
        Ok(PageSize {
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub(crate) fn is_wrapped(&self, page_id: ObjectId) -> bool {
        self.wrapped.contains(&page_id)
    }

    pub(crate) fn mark_wrapped(&mut self, page_id: ObjectId) {
        self.wrapped.insert(page_id);
    }

    pub(crate) const fn document(&self) -> &Document {
        &self.doc
    }

    pub(crate) const fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Serialize the document. Consumes it: a document is written once.
    pub fn into_bytes(mut self, compress: bool) -> Result<Vec<u8>> {
        if compress {
            self.doc.compress();
        }

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save merged PDF: {e}")))?;

        Ok(output)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutputDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDocument")
            .field("page_count", &self.page_ids.len())
            .field("objects", &self.doc.objects.len())
            .finish()
    }
}

/// Read a four-number rectangle such as MediaBox, resolving one level of
/// indirection for the array itself.
pub(crate) fn media_box(doc: &Document, page: &Dictionary) -> Option<[f32; 4]> {
    let obj = page.get(b"MediaBox").ok()?;
    let arr = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };

    if arr.len() != 4 {
        return None;
    }

    let values: Vec<f32> = arr.iter().filter_map(number).collect();
    match values.as_slice() {
        &[a, b, c, d] => Some([a.min(c), b.min(d), a.max(c), b.max(d)]),
        _ => None,
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        #[allow(clippy::cast_precision_loss)]
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
