//! Read-only summaries of a serialized PDF: page sizes and shown text.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;

use crate::error::{Error, Result};
use super::font::decode_win_ansi;
use super::output::media_box;

/// What a page shows, as far as stamp verification cares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    /// 1-based page number
    pub number: usize,
    pub width: f32,
    pub height: f32,
    /// Strings shown by text operators, in content order
    pub text_runs: Vec<String>,
}

/// Summarize every page of a PDF.
pub fn inspect_pdf(bytes: &[u8]) -> Result<Vec<PageSummary>> {
    let doc = Document::load_mem(bytes).map_err(|e| Error::parse("inspected document", e))?;

    Ok(doc
        .get_pages()
        .into_iter()
        .map(|(number, page_id)| {
            let (width, height) = doc
                .get_dictionary(page_id)
                .ok()
                .and_then(|page| media_box(&doc, page))
                .map_or((0.0, 0.0), |[x0, y0, x1, y1]| (x1 - x0, y1 - y0));
            PageSummary {
                number: number as usize,
                width,
                height,
                text_runs: page_text_runs(&doc, page_id),
            }
        })
        .collect())
}

/// Operations of every content stream on a page, decoded stream by stream.
///
/// Streams that fail to decode are skipped.
pub(crate) fn page_operations(doc: &Document, page_id: ObjectId) -> Vec<Operation> {
    doc.get_page_contents(page_id)
        .into_iter()
        .filter_map(|id| doc.get_object(id).and_then(Object::as_stream).ok())
        .filter_map(|stream| {
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            Content::decode(&data).ok()
        })
        .flat_map(|content| content.operations)
        .collect()
}

/// Strings shown on a page by `Tj`, `TJ`, `'` and `"`.
pub(crate) fn page_text_runs(doc: &Document, page_id: ObjectId) -> Vec<String> {
    page_operations(doc, page_id)
        .iter()
        .filter_map(shown_text)
        .collect()
}

fn shown_text(op: &Operation) -> Option<String> {
    match op.operator.as_str() {
        "Tj" | "'" => op.operands.first().and_then(string_bytes).map(decode_win_ansi),
        "\"" => op.operands.get(2).and_then(string_bytes).map(decode_win_ansi),
        "TJ" => {
            let parts = op.operands.first()?.as_array().ok()?;
            let bytes: Vec<u8> = parts
                .iter()
                .filter_map(string_bytes)
                .flatten()
                .copied()
                .collect();
            Some(decode_win_ansi(&bytes))
        }
        _ => None,
    }
}

fn string_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes.as_slice()),
        _ => None,
    }
}
