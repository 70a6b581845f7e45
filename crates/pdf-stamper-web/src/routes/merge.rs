//! Merge route - two uploaded PDFs in, one labelled PDF out.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use axum_extra::extract::Multipart;
use pdf_stamper_core::{Error, PdfSource};
use std::sync::Arc;
use tracing::{error, info};

use crate::helpers::{is_pdf_content_type, OptionExt, ResultExt, RouteResult};
use crate::state::AppState;

/// Shown when a file is missing or is not a PDF.
pub const INVALID_FILE_MESSAGE: &str = "Please select a valid PDF file.";

/// Shown for any failure inside the merge itself. Details go to the log.
pub const MERGE_FAILED_MESSAGE: &str = "Could not merge the PDF files.";

/// Merge the `first` and `second` uploads and return the result as a download.
///
/// Pages of `second` are labelled from the file name of `first`.
pub async fn merge_pdfs(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let mut first = None;
    let mut second = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let slot = match field.name() {
            Some("first") => &mut first,
            Some("second") => &mut second,
            _ => continue,
        };

        if !is_pdf_content_type(field.content_type()) {
            return Err((StatusCode::BAD_REQUEST, INVALID_FILE_MESSAGE.to_string()));
        }

        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        let data = field.bytes().await.or_bad_request()?;
        *slot = Some(PdfSource::new(filename, data.to_vec()));
    }

    let first = first.or_bad_request(INVALID_FILE_MESSAGE)?;
    let second = second.or_bad_request(INVALID_FILE_MESSAGE)?;
    let (first_name, second_name) = (first.name.clone(), second.name.clone());

    let merged = state.stamper.merge(first, second).await.map_err(|e| {
        error!(kind = e.kind(), "Failed to merge '{}' + '{}': {}", first_name, second_name, e);
        (failure_status(&e), MERGE_FAILED_MESSAGE.to_string())
    })?;

    info!(
        "Merged '{}' + '{}' into {} pages labelled '{}'",
        first_name, second_name, merged.page_count, merged.label
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", merged.suggested_name),
        )
        .body(Body::from(merged.bytes))
        .or_internal_error()
}

/// Unreadable uploads are the client's fault; everything else is ours.
const fn failure_status(err: &Error) -> StatusCode {
    match err {
        Error::PdfParse { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
