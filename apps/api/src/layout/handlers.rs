//! Axum route handler for the CV layout endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::layout::{layout_cv, CvLayout, FontFamily};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub text: String,
    #[serde(default)]
    pub font: Option<FontFamily>,
}

/// POST /api/v1/cv/layout
///
/// Paginates an optimized CV using the server's page geometry, optionally in another font.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<CvLayout>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let mut config = state.page_config.clone();
    if let Some(font) = request.font {
        config.font = font;
    }

    let layout = layout_cv(&request.text, &config);
    info!(
        "Laid out CV on {} page(s) with {} section header(s)",
        layout.pages.len(),
        layout.section_headers.len()
    );
    Ok(Json(layout))
}
