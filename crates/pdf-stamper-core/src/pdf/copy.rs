//! Page transplantation between documents.
//!
//! A copied page is a deep copy of everything reachable from its page
//! dictionary, renumbered into the output document. Attributes a page
//! inherits from its page tree (`Resources`, `MediaBox`, `CropBox`,
//! `Rotate`) are written onto the copy, so it no longer needs the source
//! tree. Objects shared between pages of one source (fonts, images) are
//! copied once per `copy_pages` call and stay shared in the output.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Error, Result};
use super::document::SourceDocument;
use super::output::OutputDocument;

/// Page attributes that may be inherited from ancestor `Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose `Parent` chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// Copy the pages at `indices` (0-based) from `source` into `output`.
///
/// Returns the new page ids in the order of `indices`. The pages are not
/// yet part of the output page tree; pass them to
/// [`OutputDocument::append_pages`].
pub fn copy_pages(
    output: &mut OutputDocument,
    source: &SourceDocument,
    indices: &[usize],
) -> Result<Vec<ObjectId>> {
    let source_pages = source.page_ids();
    let mut copier = ObjectCopier::new(source.document());

    // Reserve ids for every page up front so links between copied pages
    // resolve to the copies rather than to nothing.
    let mut plan = Vec::with_capacity(indices.len());
    for &index in indices {
        let &page_id = source_pages.get(index).ok_or_else(|| {
            Error::PdfCopy(format!(
                "page index {index} out of range for '{}' ({} pages)",
                source.name(),
                source_pages.len()
            ))
        })?;
        let new_id = copier.reserve(output.document_mut(), page_id);
        plan.push((page_id, new_id));
    }

    for &(page_id, new_id) in &plan {
        let page = flatten_page(source.document(), page_id).map_err(|reason| {
            Error::PdfCopy(format!("'{}' page {page_id:?}: {reason}", source.name()))
        })?;
        let copied = copier.copy_dictionary(output.document_mut(), &page);
        output
            .document_mut()
            .objects
            .insert(new_id, Object::Dictionary(copied));
    }

    debug!(
        "Copied {} pages from '{}' ({} objects)",
        plan.len(),
        source.name(),
        copier.mapping.len()
    );

    Ok(plan.into_iter().map(|(_, new_id)| new_id).collect())
}

/// Clone a page dictionary with its inherited attributes filled in and its
/// `Parent` link removed.
fn flatten_page(doc: &Document, page_id: ObjectId) -> std::result::Result<Dictionary, String> {
    let mut page = doc
        .get_object(page_id)
        .map_err(|e| format!("page object missing: {e}"))?
        .as_dict()
        .map_err(|_| "page object is not a dictionary".to_string())?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return Err("page tree is nested too deeply or cyclic".to_string());
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.remove(b"Parent");
    Ok(page)
}

/// Deep-copies objects from one document into another, remembering which
/// source ids were already copied.
struct ObjectCopier<'a> {
    source: &'a Document,
    mapping: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            mapping: HashMap::new(),
        }
    }

    fn reserve(&mut self, target: &mut Document, source_id: ObjectId) -> ObjectId {
        *self
            .mapping
            .entry(source_id)
            .or_insert_with(|| target.new_object_id())
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(target, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dictionary(target, &stream.dict);
                Object::Stream(copied)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.copy_object(target, value));
        }
        copied
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(&new_id) = self.mapping.get(&id) {
            return Object::Reference(new_id);
        }

        let Ok(object) = self.source.get_object(id) else {
            debug!("Dropping dangling reference {:?}", id);
            return Object::Null;
        };

        // Only the requested pages travel; the source's tree and any other
        // page reached through links or annotations are left behind.
        if matches!(object.type_name(), Ok(b"Catalog" | b"Pages" | b"Page")) {
            return Object::Null;
        }

        // Map before recursing so cycles terminate.
        let new_id = self.reserve(target, id);
        let copied = self.copy_object(target, object);
        target.objects.insert(new_id, copied);
        Object::Reference(new_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pdf::testing::{build_pdf, build_pdf_with_inherited_box, page_text_runs};

    fn source(name: &str, bytes: &[u8]) -> SourceDocument {
        SourceDocument::from_bytes(name, bytes).unwrap()
    }

    #[test]
    fn test_copy_all_pages_in_order() {
        let src = source("a.pdf", &build_pdf(&["first", "second", "third"], (612, 792)));
        let mut output = OutputDocument::new();

        let copied = copy_pages(&mut output, &src, &[0, 1, 2]).unwrap();
        output.append_pages(&copied).unwrap();

        let texts: Vec<Vec<String>> = copied
            .iter()
            .map(|&id| page_text_runs(output.document(), id))
            .collect();
        assert_eq!(
            texts,
            vec![vec!["first".to_string()], vec!["second".to_string()], vec!["third".to_string()]]
        );
    }

    #[test]
    fn test_copy_subset_respects_index_order() {
        let src = source("a.pdf", &build_pdf(&["p1", "p2", "p3"], (612, 792)));
        let mut output = OutputDocument::new();

        let copied = copy_pages(&mut output, &src, &[2, 0]).unwrap();
        let texts: Vec<String> = copied
            .iter()
            .flat_map(|&id| page_text_runs(output.document(), id))
            .collect();
        assert_eq!(texts, vec!["p3", "p1"]);
    }

    #[test]
    fn test_copy_out_of_range_is_copy_error() {
        let src = source("a.pdf", &build_pdf(&["only"], (612, 792)));
        let mut output = OutputDocument::new();
        let err = copy_pages(&mut output, &src, &[1]).unwrap_err();
        assert!(matches!(err, Error::PdfCopy(_)));
    }

    #[test]
    fn test_copy_materialises_inherited_attributes() {
        let src = source("a.pdf", &build_pdf_with_inherited_box(&["x"], (300, 400)));
        let mut output = OutputDocument::new();

        let copied = copy_pages(&mut output, &src, &[0]).unwrap();
        let page = output.document().get_dictionary(copied[0]).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        assert!(!page.has(b"Parent"));

        let size = output.page_size(copied[0]).unwrap();
        assert!((size.width - 300.0).abs() < f32::EPSILON);
        assert!((size.height - 400.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shared_resources_copied_once() {
        let src = source("a.pdf", &build_pdf(&["a", "b"], (612, 792)));
        let mut output = OutputDocument::new();
        let before = output.document().objects.len();

        copy_pages(&mut output, &src, &[0, 1]).unwrap();

        // Two pages + two content streams + one shared font
        assert_eq!(output.document().objects.len() - before, 5);
    }

    #[test]
    fn test_copied_page_does_not_reference_source_tree() {
        let src = source("a.pdf", &build_pdf(&["a"], (612, 792)));
        let mut output = OutputDocument::new();
        let copied = copy_pages(&mut output, &src, &[0]).unwrap();
        output.append_pages(&copied).unwrap();

        // Exactly one Pages node and one Catalog exist in the output
        let count = |ty: &[u8]| {
            output
                .document()
                .objects
                .values()
                .filter(|o| o.type_name().is_ok_and(|t| t == ty))
                .count()
        };
        assert_eq!(count(b"Pages"), 1);
        assert_eq!(count(b"Catalog"), 1);
    }
}
