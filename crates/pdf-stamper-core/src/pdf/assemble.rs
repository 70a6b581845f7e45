use lopdf::ObjectId;
use tracing::debug;

use crate::error::Result;
use super::copy::copy_pages;
use super::document::SourceDocument;
use super::output::OutputDocument;

/// An output document holding every page of A followed by every page of B.
///
/// The page lists record where each page came from; nothing in the
/// document itself does.
#[derive(Debug)]
pub struct Assembly {
    pub output: OutputDocument,
    pub pages_from_a: Vec<ObjectId>,
    pub pages_from_b: Vec<ObjectId>,
}

/// Copy all pages of `a`, then all pages of `b`, into a fresh document.
pub fn assemble(a: &SourceDocument, b: &SourceDocument) -> Result<Assembly> {
    let mut output = OutputDocument::new();

    let pages_from_a = copy_all(&mut output, a)?;
    output.append_pages(&pages_from_a)?;

    let pages_from_b = copy_all(&mut output, b)?;
    output.append_pages(&pages_from_b)?;

    debug!(
        "Assembled {} + {} pages from '{}' and '{}'",
        pages_from_a.len(),
        pages_from_b.len(),
        a.name(),
        b.name()
    );

    Ok(Assembly {
        output,
        pages_from_a,
        pages_from_b,
    })
}

fn copy_all(output: &mut OutputDocument, source: &SourceDocument) -> Result<Vec<ObjectId>> {
    let indices: Vec<usize> = (0..source.page_count()).collect();
    copy_pages(output, source, &indices)
}
