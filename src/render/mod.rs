//! # Rendering
//!
//! Geometry and output for linear barcodes.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`path`] | Bit string → run-merged rectangle path commands |
//! | [`fit`] | Uniform scale into the available viewport width |
//! | [`svg`] | SVG document writer |
//! | [`raster`] | PNG rasterizer |

pub mod fit;
pub mod path;
pub mod raster;
pub mod svg;

pub use fit::{FitResult, fit};
pub use path::{CompiledBarcode, GeometryOptions, RectPath, compile};
