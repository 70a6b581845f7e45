//! Label preview - what a first-document name would be stamped as.

use axum::{extract::Query, Json};
use pdf_stamper_core::derive_label;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct LabelQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
pub struct LabelResponse {
    pub name: String,
    pub label: String,
}

/// `GET /api/label?name=...`
pub async fn preview_label(Query(query): Query<LabelQuery>) -> Json<LabelResponse> {
    let label = derive_label(&query.name);
    Json(LabelResponse {
        name: query.name,
        label,
    })
}
