//! # Barcode Component
//!
//! Drives one render cycle: encode the value, compile the bits into
//! rectangles, fit them into the viewport, and hand a [`Frame`] to the host.
//!
//! ```text
//! BarcodeOptions ──▶ Registry::create ──▶ valid()? ──▶ encode()
//!                                                        │
//!                        ┌───────────────────────────────┘
//!                        ▼
//!               compile(bits) ──▶ fit(total_width, viewport) ──▶ Frame
//! ```
//!
//! Compiled geometry is memoized on `(value, format, width, height)`. Style
//! changes and viewport changes reuse it; a failed cycle drops it.
//!
//! ## Failure routing
//!
//! With an error callback installed, failures are delivered to it and
//! [`Barcode::render`] returns `Ok(None)`. Without one, the failure is
//! returned as `Err` and the host should abort the cycle.
//!
//! ```
//! use barpath::barcode::{Barcode, BarcodeOptions};
//!
//! let mut barcode = Barcode::new(BarcodeOptions {
//!     value: "ABC-123".into(),
//!     ..Default::default()
//! });
//! let frame = barcode.render(400.0).unwrap().unwrap();
//! assert_eq!(frame.fit.scale, 1.0);
//! assert!(!frame.geometry.rects.is_empty());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::BarcodeError;
use crate::render::fit::{FitResult, fit};
use crate::render::path::{CompiledBarcode, GeometryOptions, compile};
use crate::symbology::{DEFAULT_FORMAT, EncodeOptions, Registry};

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_width() -> f64 {
    2.0
}

fn default_height() -> f64 {
    100.0
}

fn default_ink() -> String {
    "#000000".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_font_size() -> f64 {
    20.0
}

fn default_text_margin() -> f64 {
    2.0
}

/// Configuration surface of a barcode.
///
/// Deserializes from camelCase JSON; every field except `value` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeOptions {
    /// What the barcode stands for.
    #[serde(default)]
    pub value: String,
    /// Registered format name.
    #[serde(default = "default_format")]
    pub format: String,
    /// Label drawn under the bars. `None` = no label.
    #[serde(default)]
    pub text: Option<String>,
    /// Width of a single bar module.
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_ink")]
    pub line_color: String,
    #[serde(default = "default_ink")]
    pub text_color: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Gap between the bars and the label.
    #[serde(default = "default_text_margin")]
    pub text_margin: f64,
    #[serde(default)]
    pub encode: EncodeOptions,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            value: String::new(),
            format: default_format(),
            text: None,
            width: default_width(),
            height: default_height(),
            line_color: default_ink(),
            text_color: default_ink(),
            background: default_background(),
            font_size: default_font_size(),
            text_margin: default_text_margin(),
            encode: EncodeOptions::default(),
        }
    }
}

impl BarcodeOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, BarcodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn geometry(&self) -> GeometryOptions {
        GeometryOptions {
            bar_width: self.width,
            bar_height: self.height,
        }
    }

    fn check_geometry(&self) -> Result<GeometryOptions, BarcodeError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width) {
            return Err(BarcodeError::InvalidOption(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !positive(self.height) {
            return Err(BarcodeError::InvalidOption(format!(
                "height must be positive, got {}",
                self.height
            )));
        }
        Ok(self.geometry())
    }

    fn style(&self) -> Result<Style, BarcodeError> {
        Ok(Style {
            line_color: self.line_color.parse()?,
            text_color: self.text_color.parse()?,
            background: self.background.parse()?,
            font_size: self.font_size.max(0.0),
            text_margin: self.text_margin.max(0.0),
        })
    }

    fn key(&self) -> GeometryKey {
        GeometryKey {
            value: self.value.clone(),
            format: self.format.to_uppercase(),
            width: self.width.to_bits(),
            height: self.height.to_bits(),
            encode: self.encode.clone(),
        }
    }
}

/// Resolved styling handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub line_color: Color,
    pub text_color: Color,
    pub background: Color,
    pub font_size: f64,
    pub text_margin: f64,
}

/// Everything the host needs to draw one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub geometry: Arc<CompiledBarcode>,
    pub fit: FitResult,
    pub label: Option<String>,
    /// Human readable text reported by the encoder.
    pub encoded_text: String,
    pub style: Style,
}

impl Frame {
    /// Width of the bars once scaled into the viewport.
    pub fn display_width(&self) -> f64 {
        self.geometry.total_width * self.fit.scale
    }
}

/// Inputs that determine the geometry. Floats are compared bitwise.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GeometryKey {
    value: String,
    format: String,
    width: u64,
    height: u64,
    encode: EncodeOptions,
}

#[derive(Debug)]
struct Cached {
    key: GeometryKey,
    geometry: Arc<CompiledBarcode>,
    encoded_text: String,
}

/// Failure callback. Receives each failure instead of it being returned.
pub type ErrorCallback = Box<dyn FnMut(&BarcodeError) + Send>;

/// A barcode bound to its options, with memoized geometry.
pub struct Barcode {
    options: BarcodeOptions,
    registry: Arc<Registry>,
    on_error: Option<ErrorCallback>,
    cache: Option<Cached>,
    compiles: usize,
}

impl Barcode {
    /// Barcode using the built-in format registry.
    pub fn new(options: BarcodeOptions) -> Self {
        Self::with_registry(options, Arc::new(Registry::builtin()))
    }

    pub fn with_registry(options: BarcodeOptions, registry: Arc<Registry>) -> Self {
        Self {
            options,
            registry,
            on_error: None,
            cache: None,
            compiles: 0,
        }
    }

    /// Route failures to `callback` instead of returning them.
    pub fn on_error(mut self, callback: impl FnMut(&BarcodeError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &BarcodeOptions {
        &self.options
    }

    /// Replace the options. Geometry is recompiled lazily, and only if a
    /// geometry input changed.
    pub fn set_options(&mut self, options: BarcodeOptions) {
        self.options = options;
    }

    /// Number of times geometry has actually been compiled.
    pub fn compile_count(&self) -> usize {
        self.compiles
    }

    /// Run one render cycle against the current viewport width.
    ///
    /// Returns `Ok(None)` when a failure was delivered to the error callback.
    pub fn render(&mut self, viewport_width: f64) -> Result<Option<Frame>, BarcodeError> {
        match self.cycle(viewport_width) {
            Ok(frame) => Ok(Some(frame)),
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: BarcodeError) -> Result<Option<Frame>, BarcodeError> {
        match self.on_error.as_mut() {
            Some(callback) => {
                warn!(error = %err.detail(), "barcode failure reported to callback");
                callback(&err);
                Ok(None)
            }
            None => Err(err),
        }
    }

    fn cycle(&mut self, viewport_width: f64) -> Result<Frame, BarcodeError> {
        let (geometry, encoded_text) = self.geometry()?;
        let style = self.options.style()?;

        let fit = fit(geometry.total_width, viewport_width);
        if fit.degraded {
            warn!(
                total_width = geometry.total_width,
                viewport_width,
                scale = fit.scale,
                "barcode too wide to render legibly"
            );
            return Err(BarcodeError::Legibility { scale: fit.scale });
        }

        Ok(Frame {
            geometry,
            fit,
            label: self.options.text.clone(),
            encoded_text,
            style,
        })
    }

    /// Memoized geometry for the current options.
    fn geometry(&mut self) -> Result<(Arc<CompiledBarcode>, String), BarcodeError> {
        let key = self.options.key();
        if let Some(cached) = self.cache.as_ref().filter(|c| c.key == key) {
            debug!(format = %key.format, "geometry cache hit");
            return Ok((cached.geometry.clone(), cached.encoded_text.clone()));
        }

        // Never serve geometry from a previous key, even if this one fails.
        self.cache = None;

        let geometry_options = self.options.check_geometry()?;
        let encoded = self
            .registry
            .encode(&self.options.format, &self.options.value, &self.options.encode)?;
        let bits = encoded.data();
        let geometry = Arc::new(compile(&bits, geometry_options));
        self.compiles += 1;

        debug!(
            format = %key.format,
            columns = geometry.columns,
            rects = geometry.rects.len(),
            total_width = geometry.total_width,
            "compiled barcode geometry"
        );

        let encoded_text = encoded.text();
        self.cache = Some(Cached {
            key,
            geometry: geometry.clone(),
            encoded_text: encoded_text.clone(),
        });
        Ok((geometry, encoded_text))
    }
}
