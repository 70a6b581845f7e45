mod assemble;
mod copy;
mod document;
mod font;
mod inspect;
mod output;
mod stamp;

#[cfg(test)]
mod testing;

pub use assemble::{Assembly, assemble};
pub use copy::copy_pages;
pub use document::{PdfSource, SourceDocument};
pub use font::{FontHandle, StandardFont, decode_win_ansi, embed_standard_font, encode_win_ansi};
pub use inspect::{PageSummary, inspect_pdf};
pub use output::{OutputDocument, PageSize};
pub use stamp::{Stamper, TextStyle, draw_text};
