use std::path::Path;

use lopdf::{Document, ObjectId};

use crate::error::{Error, Result};

/// Raw input for a merge: the origin name plus the full file bytes.
#[derive(Clone)]
pub struct PdfSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a source from disk, using the file name as the origin name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(crate::util::file_name_lossy(path), bytes))
    }

    /// Async variant of [`PdfSource::from_file`].
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(crate::util::file_name_lossy(path), bytes))
    }

    /// Parse the bytes into a [`SourceDocument`].
    pub fn parse(&self) -> Result<SourceDocument> {
        SourceDocument::from_bytes(&self.name, &self.bytes)
    }
}

impl std::fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSource")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// A parsed input PDF.
///
/// Read-only once loaded: pages are copied out of it, never modified in place.
pub struct SourceDocument {
    name: String,
    doc: Document,
    page_ids: Vec<ObjectId>,
    byte_len: usize,
}

impl SourceDocument {
    /// Parse a PDF from bytes. `name` is the origin name used for labelling.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::parse(name, "input is empty"));
        }

        let doc = Document::load_mem(bytes).map_err(|e| Error::parse(name, e))?;

        // get_pages is keyed by 1-based page number, so values come out in page order
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        Ok(Self {
            name: name.to_string(),
            doc,
            page_ids,
            byte_len: bytes.len(),
        })
    }

    /// Origin name (typically the file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the buffer this document was parsed from
    pub const fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page object ids in document order
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    pub(crate) const fn document(&self) -> &Document {
        &self.doc
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("name", &self.name)
            .field("page_count", &self.page_ids.len())
            .field("bytes_len", &self.byte_len)
            .finish()
    }
}
