//! Barcode API handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    barcode::{Barcode, BarcodeOptions, Frame},
    error::{BarcodeError, ErrorKind},
    render::{raster, svg},
};

use super::super::state::AppState;

/// Query parameters for the SVG/PNG endpoints.
///
/// Kept flat (no `#[serde(flatten)]`) so numeric fields parse from the
/// query string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeQuery {
    pub value: String,
    pub format: Option<String>,
    pub text: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub line_color: Option<String>,
    pub text_color: Option<String>,
    pub background: Option<String>,
    pub font_size: Option<f64>,
    pub viewport: Option<f64>,
}

impl BarcodeQuery {
    fn options(self) -> BarcodeOptions {
        let defaults = BarcodeOptions::default();
        BarcodeOptions {
            value: self.value,
            format: self.format.unwrap_or(defaults.format),
            text: self.text,
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            line_color: self.line_color.unwrap_or(defaults.line_color),
            text_color: self.text_color.unwrap_or(defaults.text_color),
            background: self.background.unwrap_or(defaults.background),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            ..defaults
        }
    }
}

/// Body for POST /api/barcode.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(flatten)]
    pub options: BarcodeOptions,
    pub viewport: Option<f64>,
}

fn status_for(err: &BarcodeError) -> StatusCode {
    match err.kind() {
        ErrorKind::Construction | ErrorKind::Validation | ErrorKind::Legibility => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::Host => match err {
            BarcodeError::InvalidOption(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// One render cycle without a callback: failures become error responses.
fn render_frame(
    state: &AppState,
    options: BarcodeOptions,
    viewport: Option<f64>,
) -> Result<Frame, (StatusCode, String)> {
    let viewport = viewport.unwrap_or(state.config.viewport_width);
    let mut barcode = Barcode::with_registry(options, state.registry.clone());
    match barcode.render(viewport) {
        Ok(Some(frame)) => Ok(frame),
        Ok(None) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "render produced no frame".to_string(),
        )),
        Err(e) => Err((status_for(&e), e.detail())),
    }
}

/// GET /api/formats - List registered format names.
pub async fn formats(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(
        state
            .registry
            .formats()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// GET /api/barcode.svg - Render as SVG.
pub async fn render_svg(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BarcodeQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let viewport = query.viewport;
    let frame = render_frame(&state, query.options(), viewport)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg::to_svg(&frame)))
}

/// GET /api/barcode.png - Render as PNG.
pub async fn render_png(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BarcodeQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let viewport = query.viewport;
    let frame = render_frame(&state, query.options(), viewport)?;
    let png_bytes = raster::to_png(&frame).map_err(|e| (status_for(&e), e.detail()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// POST /api/barcode - Render to JSON geometry.
pub async fn geometry(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<Frame>, (StatusCode, String)> {
    render_frame(&state, request.options, request.viewport).map(Json)
}
