//! HTTP route handlers for the PDF stamper web application.
//!
//! The index page is an Askama template; merges return the PDF itself and
//! label previews return JSON.

mod label;
mod merge;
mod pages;

pub use label::preview_label;
pub use merge::merge_pdfs;
pub use pages::index;
