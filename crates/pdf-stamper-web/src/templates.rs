//! Askama templates.
//!
//! - `base.html` - Common layout with inline CSS
//! - `index.html` - Upload form for the two documents

use askama::Template;
use askama_web::WebTemplate;

/// Landing page with upload form.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// File name the merged document downloads as
    pub output_name: String,
}

impl IndexTemplate {
    pub fn new(output_name: &str) -> Self {
        Self {
            output_name: output_name.to_string(),
        }
    }
}
