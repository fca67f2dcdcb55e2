//! # barpath - Linear Barcodes as Vector Paths
//!
//! barpath renders a linear barcode as a compact, scalable vector path. It
//! provides:
//!
//! - **Symbologies**: a format registry over the barcoders crate (Code 128,
//!   Code 39, EAN/UPC, ITF, Codabar, ...), open to new formats
//! - **Path compiler**: bit strings → run-merged rectangle path commands
//! - **Fit policy**: uniform shrink-to-viewport with a legibility threshold
//! - **Outputs**: SVG documents, PNG images and JSON geometry
//! - **Server**: an HTTP endpoint serving all of the above
//!
//! ## Quick Start
//!
//! ```
//! use barpath::{Barcode, BarcodeOptions, render::svg};
//!
//! let mut barcode = Barcode::new(BarcodeOptions {
//!     value: "590123412345".into(),
//!     format: "EAN13".into(),
//!     text: Some("5901234123457".into()),
//!     ..Default::default()
//! });
//!
//! // Viewport width is read fresh every cycle.
//! let frame = barcode.render(360.0)?.expect("no callback installed");
//! assert_eq!(frame.geometry.total_width, 95.0 * 2.0);
//!
//! let document = svg::to_svg(&frame);
//! assert!(document.starts_with("<svg"));
//! # Ok::<(), barpath::error::BarcodeError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`symbology`] | Encoder contract and format registry |
//! | [`render`] | Path compiler, fit policy, SVG and PNG output |
//! | [`barcode`] | Render cycle with memoized geometry and error routing |
//! | [`color`] | Hex color parsing |
//! | [`server`] | HTTP server |
//! | [`error`] | Error types |

pub mod barcode;
pub mod color;
pub mod error;
pub mod render;
pub mod server;
pub mod symbology;

// Re-exports for convenience
pub use barcode::{Barcode, BarcodeOptions, Frame};
pub use error::BarcodeError;
pub use render::{CompiledBarcode, FitResult, GeometryOptions, compile, fit};
