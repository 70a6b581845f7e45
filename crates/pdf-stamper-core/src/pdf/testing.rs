//! In-memory PDF fixtures for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

pub(crate) use super::inspect::{page_operations, page_text_runs};

/// A PDF with one page per entry in `texts`, each showing that text.
///
/// All pages share one Helvetica font object and carry their own
/// MediaBox of `size` and an inline Resources dictionary.
pub(crate) fn build_pdf(texts: &[&str], size: (i64, i64)) -> Vec<u8> {
    build(texts, size, false)
}

/// Like [`build_pdf`], but MediaBox and Resources live on the page tree
/// root and are inherited by the pages.
pub(crate) fn build_pdf_with_inherited_box(texts: &[&str], size: (i64, i64)) -> Vec<u8> {
    build(texts, size, true)
}

#[allow(clippy::unwrap_used)]
fn build(texts: &[&str], (width, height): (i64, i64), inherited: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources = Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]);
    let media_box = Object::Array(vec![0.into(), 0.into(), width.into(), height.into()]);

    let mut kids = Vec::with_capacity(texts.len());
    for text in texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let mut page = Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if !inherited {
            page.set("Resources", Object::Dictionary(resources.clone()));
            page.set("MediaBox", media_box.clone());
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    #[allow(clippy::cast_possible_wrap)]
    let count = kids.len() as i64;
    let mut pages = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    if inherited {
        pages.set("Resources", Object::Dictionary(resources));
        pages.set("MediaBox", media_box);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}
