//! Drawing the label onto copied pages.
//!
//! # Coordinate System
//!
//! Positions are in PDF user space with the origin at the bottom-left of
//! the page. The label origin is placed relative to the top-right corner:
//! ```text
//! x = page_width  - offset_x
//! y = page_height - offset_y
//! ```
//! Nothing is clamped. A page narrower than `offset_x` or shorter than
//! `offset_y` gets a label origin outside the visible area.
//!
//! # Content Layout
//!
//! The first stamp on a page wraps the existing content in `q … Q` so any
//! graphics state the page leaves behind (transforms, colors, clipping)
//! does not affect the label. Each stamp is a separate content stream
//! appended after that.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::config::{StampConfig, TextColor};
use crate::error::{Error, Result};
use super::font::{FontHandle, embed_standard_font, encode_win_ansi};
use super::output::OutputDocument;

/// Prefix for the font resource name added to stamped pages.
const FONT_RESOURCE_PREFIX: &str = "FStamp";

/// Text placement and appearance for one draw call.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: TextColor,
}

/// Stamps one label onto a set of pages.
pub struct Stamper {
    config: StampConfig,
}

impl Stamper {
    pub const fn new(config: StampConfig) -> Self {
        Self { config }
    }

    /// Draw `label` once on every page in `pages`, in order.
    ///
    /// The font is embedded once and shared by all pages. Returns the number
    /// of pages stamped. On error the document is left partially stamped;
    /// callers discard it.
    pub fn stamp(
        &self,
        output: &mut OutputDocument,
        pages: &[ObjectId],
        label: &str,
    ) -> Result<usize> {
        if pages.is_empty() {
            return Ok(0);
        }

        let font = embed_standard_font(output, &self.config.font)?;
        debug!("Embedded {} as {:?}", font.font, font.id);

        for &page_id in pages {
            let size = output.page_size(page_id)?;
            let style = TextStyle {
                x: size.width - self.config.offset_x,
                y: size.height - self.config.offset_y,
                size: self.config.font_size,
                color: self.config.color,
            };
            draw_text(output, page_id, label, &style, font)?;
        }

        Ok(pages.len())
    }
}

/// Draw a single line of text on a page of `output`.
pub fn draw_text(
    output: &mut OutputDocument,
    page_id: ObjectId,
    text: &str,
    style: &TextStyle,
    font: FontHandle,
) -> Result<()> {
    let page_number = output.page_number(page_id).unwrap_or(0);
    let draw_error = |reason: String| Error::Draw {
        page: page_number,
        reason,
    };

    let encoded = encode_win_ansi(text).map_err(|c| {
        draw_error(format!(
            "character {c:?} (U+{:04X}) cannot be encoded for {}",
            u32::from(c),
            font.font
        ))
    })?;

    let wrap_existing = !output.is_wrapped(page_id);
    let doc = output.document_mut();

    // Validate the page before touching anything else in the document
    doc.get_dictionary(page_id)
        .map_err(|e| draw_error(format!("page object is missing: {e}")))?;

    let resource_name = register_font(doc, page_id, font.id).map_err(draw_error)?;
    let content = text_operations(&resource_name, &encoded, style)
        .encode()
        .map_err(|e| draw_error(format!("failed to encode content stream: {e}")))?;

    append_content(doc, page_id, content, wrap_existing).map_err(draw_error)?;
    output.mark_wrapped(page_id);
    Ok(())
}

/// Content stream operators that show `encoded` at the style's position.
fn text_operations(resource_name: &str, encoded: &[u8], style: &TextStyle) -> Content {
    let color = style.color.clamped();
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "rg",
                vec![
                    Object::Real(color.r),
                    Object::Real(color.g),
                    Object::Real(color.b),
                ],
            ),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(resource_name.as_bytes().to_vec()),
                    Object::Real(style.size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(style.x), Object::Real(style.y)]),
            Operation::new("Tj", vec![Object::string_literal(encoded.to_vec())]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ],
    }
}

/// Add the font to the page's `/Resources /Font` under an unused name.
///
/// Resources and the font sub-dictionary are written back inline on the
/// page, so pages that shared a resource object do not see each other's
/// additions.
fn register_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> std::result::Result<String, String> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| format!("page object is missing: {e}"))?;

    let mut resources = page
        .get(b"Resources")
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))
        .unwrap_or_default();

    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))
        .unwrap_or_default();

    // Reuse the name if this font is already registered on the page
    let existing = fonts.iter().find_map(|(key, value)| {
        matches!(value, Object::Reference(id) if *id == font_id)
            .then(|| String::from_utf8_lossy(key).into_owned())
    });

    let name = if let Some(name) = existing {
        name
    } else {
        let name = unused_name(&fonts);
        fonts.set(name.as_bytes().to_vec(), Object::Reference(font_id));
        name
    };

    resources.set("Font", Object::Dictionary(fonts));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| format!("page object is missing: {e}"))?;
    page.set("Resources", Object::Dictionary(resources));

    Ok(name)
}

fn unused_name(fonts: &Dictionary) -> String {
    if !fonts.has(FONT_RESOURCE_PREFIX.as_bytes()) {
        return FONT_RESOURCE_PREFIX.to_string();
    }
    (1..)
        .map(|n| format!("{FONT_RESOURCE_PREFIX}{n}"))
        .find(|candidate| !fonts.has(candidate.as_bytes()))
        .unwrap_or_default()
}

fn resolve_dict(doc: &Document, obj: &Object) -> Option<Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

/// Ids of the streams currently making up a page's content.
fn content_ids(doc: &Document, contents: Option<&Object>) -> Vec<ObjectId> {
    match contents {
        Some(Object::Reference(id)) => match doc.get_object(*id) {
            // Contents may point at an array of stream references
            Ok(Object::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_reference().ok())
                .collect(),
            _ => vec![*id],
        },
        Some(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_reference().ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
    wrap_existing: bool,
) -> std::result::Result<(), String> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| format!("page object is missing: {e}"))?;
    let mut streams = content_ids(doc, page.get(b"Contents").ok());

    if wrap_existing && !streams.is_empty() {
        let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let close = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        streams.insert(0, open);
        streams.push(close);
    }

    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), content));
    streams.push(stamp_id);

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| format!("page object is missing: {e}"))?;
    page.set(
        "Contents",
        Object::Array(streams.into_iter().map(Object::Reference).collect()),
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pdf::copy::copy_pages;
    use crate::pdf::document::SourceDocument;
    use crate::pdf::testing::{build_pdf, page_operations, page_text_runs};

    fn output_with(texts: &[&str], size: (i64, i64)) -> (OutputDocument, Vec<ObjectId>) {
        let bytes = build_pdf(texts, size);
        let source = SourceDocument::from_bytes("b.pdf", &bytes).unwrap();
        let mut output = OutputDocument::new();
        let indices: Vec<usize> = (0..source.page_count()).collect();
        let pages = copy_pages(&mut output, &source, &indices).unwrap();
        output.append_pages(&pages).unwrap();
        (output, pages)
    }

    fn td_position(output: &OutputDocument, page_id: ObjectId) -> Vec<(f32, f32)> {
        page_operations(output.document(), page_id)
            .into_iter()
            .filter(|op| op.operator == "Td")
            .map(|op| {
                let n = |o: &Object| match o {
                    Object::Real(r) => *r,
                    #[allow(clippy::cast_precision_loss)]
                    Object::Integer(i) => *i as f32,
                    _ => f32::NAN,
                };
                (n(&op.operands[0]), n(&op.operands[1]))
            })
            .collect()
    }

    #[test]
    fn test_stamp_every_page_once() {
        let (mut output, pages) = output_with(&["one", "two"], (612, 792));
        let stamper = Stamper::new(StampConfig::default());

        assert_eq!(stamper.stamp(&mut output, &pages, "10/20").unwrap(), 2);

        for &page in &pages {
            let runs = page_text_runs(output.document(), page);
            assert_eq!(runs.iter().filter(|r| *r == "10/20").count(), 1);
        }
    }

    #[test]
    fn test_position_relative_to_top_right() {
        let (mut output, pages) = output_with(&["x"], (612, 792));
        Stamper::new(StampConfig::default())
            .stamp(&mut output, &pages, "1/2")
            .unwrap();

        // The fixture's own text sits at 72 720
        let positions = td_position(&output, pages[0]);
        assert_eq!(positions.last().copied(), Some((542.0, 762.0)));
    }

    #[test]
    fn test_small_page_is_not_clamped() {
        let (mut output, pages) = output_with(&["x"], (50, 20));
        Stamper::new(StampConfig::default())
            .stamp(&mut output, &pages, "1/2")
            .unwrap();

        let positions = td_position(&output, pages[0]);
        assert_eq!(positions.last().copied(), Some((-20.0, -10.0)));
    }

    #[test]
    fn test_font_embedded_once_per_stamp_call() {
        let (mut output, pages) = output_with(&["a", "b", "c"], (612, 792));
        Stamper::new(StampConfig::default())
            .stamp(&mut output, &pages, "label")
            .unwrap();

        let helvetica_fonts = output
            .document()
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .filter(|d| d.get(b"BaseFont").and_then(Object::as_name).is_ok_and(|n| n == b"Helvetica"))
            .count();
        // One from the fixture's shared font, one for the stamp
        assert_eq!(helvetica_fonts, 2);
    }

    #[test]
    fn test_font_name_does_not_clash_with_page_fonts() {
        let (mut output, pages) = output_with(&["a"], (612, 792));
        let font = embed_standard_font(&mut output, "Courier").unwrap();
        let style = TextStyle {
            x: 1.0,
            y: 1.0,
            size: 12.0,
            color: TextColor::black(),
        };

        draw_text(&mut output, pages[0], "first", &style, font).unwrap();
        let other = embed_standard_font(&mut output, "Courier").unwrap();
        draw_text(&mut output, pages[0], "second", &style, other).unwrap();

        let page = output.document().get_dictionary(pages[0]).unwrap();
        let fonts = page
            .get(b"Resources")
            .and_then(Object::as_dict)
            .and_then(|r| r.get(b"Font"))
            .and_then(Object::as_dict)
            .unwrap();
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(b"FStamp"));
        assert!(fonts.has(b"FStamp1"));
    }

    #[test]
    fn test_original_content_wrapped_once() {
        let (mut output, pages) = output_with(&["a"], (612, 792));
        let stamper = Stamper::new(StampConfig::default());
        stamper.stamp(&mut output, &pages, "x").unwrap();
        stamper.stamp(&mut output, &pages, "y").unwrap();

        let ops: Vec<String> = page_operations(output.document(), pages[0])
            .into_iter()
            .map(|op| op.operator)
            .collect();
        // q [original] Q, then two self-contained stamps
        assert_eq!(ops.first().map(String::as_str), Some("q"));
        let top_level_q = ops.iter().filter(|o| *o == "q").count();
        assert_eq!(top_level_q, 3);
        assert_eq!(page_text_runs(output.document(), pages[0]), vec!["a", "x", "y"]);
    }

    #[test]
    fn test_unencodable_label_is_draw_error() {
        let (mut output, pages) = output_with(&["a"], (612, 792));
        let err = Stamper::new(StampConfig::default())
            .stamp(&mut output, &pages, "票-1")
            .unwrap_err();
        assert!(matches!(err, Error::Draw { page: 1, .. }));
    }

    #[test]
    fn test_missing_page_is_draw_error() {
        let mut output = OutputDocument::new();
        let err = Stamper::new(StampConfig::default())
            .stamp(&mut output, &[(404, 0)], "x")
            .unwrap_err();
        assert_eq!(err.kind(), "draw");
    }

    #[test]
    fn test_unknown_font_is_font_error() {
        let (mut output, pages) = output_with(&["a"], (612, 792));
        let config = StampConfig {
            font: "Wingdings".to_string(),
            ..StampConfig::default()
        };
        let err = Stamper::new(config).stamp(&mut output, &pages, "x").unwrap_err();
        assert_eq!(err.kind(), "font_embed");
    }

    #[test]
    fn test_no_pages_embeds_nothing() {
        let mut output = OutputDocument::new();
        let before = output.document().objects.len();
        let stamped = Stamper::new(StampConfig::default())
            .stamp(&mut output, &[], "x")
            .unwrap();
        assert_eq!(stamped, 0);
        assert_eq!(output.document().objects.len(), before);
    }
}
