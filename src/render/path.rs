//! # Bit-Run Compiler
//!
//! Turns an encoded bit string into filled rectangles, one per contiguous
//! run of ink.
//!
//! ```text
//! bits:    1 1 0 1 0 0 1
//! column:  0 1 2 3 4 5 6
//!          └─┘   │     │
//! rects:   x=0   x=3   x=6   (times bar width)
//!          w=2   w=1   w=1
//! ```
//!
//! Each rectangle is emitted as the path command
//! `M{x},{y}h{width}v{height}h-{width}z`, so the whole symbol can be drawn
//! with a single path fill.

use std::fmt::{self, Write};

use serde::Serialize;

/// Unit geometry for a compile call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryOptions {
    /// Width of one column (module) in pixels.
    pub bar_width: f64,
    /// Height of every bar in pixels.
    pub bar_height: f64,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            bar_width: 2.0,
            bar_height: 100.0,
        }
    }
}

/// One filled rectangle, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectPath {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectPath {
    /// Rectangle covering `run` columns that start at `column`.
    fn bar(column: usize, run: usize, options: GeometryOptions) -> Self {
        Self {
            x: column as f64 * options.bar_width,
            y: 0.0,
            width: run as f64 * options.bar_width,
            height: options.bar_height,
        }
    }

    /// Path command: move, right, down, left, close.
    pub fn command(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{}h{}v{}h-{}z",
            self.x, self.y, self.width, self.height, self.width
        )
    }
}

/// Render-ready geometry for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledBarcode {
    /// Rectangles in left-to-right order.
    pub rects: Vec<RectPath>,
    /// `columns * bar_width`
    pub total_width: f64,
    pub bar_height: f64,
    /// Number of columns in the source bit string.
    pub columns: usize,
}

impl CompiledBarcode {
    /// All rectangle commands concatenated into one path `d` attribute.
    pub fn path_data(&self) -> String {
        let mut d = String::with_capacity(self.rects.len() * 24);
        for rect in &self.rects {
            write!(d, "{}", rect).unwrap();
        }
        d
    }

    /// Per-rectangle path commands.
    pub fn commands(&self) -> Vec<String> {
        self.rects.iter().map(RectPath::command).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Compile a bit string into run-merged rectangles.
///
/// Any character other than `'1'` is a gap. Adjacent `'1'` columns share a
/// single rectangle, and a run still open at the end of the string is
/// flushed after the scan.
pub fn compile(bits: &str, options: GeometryOptions) -> CompiledBarcode {
    let mut rects = Vec::new();
    let mut run = 0usize;
    let mut columns = 0usize;

    for (column, bit) in bits.chars().enumerate() {
        columns = column + 1;
        if bit == '1' {
            run += 1;
        } else if run > 0 {
            rects.push(RectPath::bar(column - run, run, options));
            run = 0;
        }
    }

    // Symbols usually end on a bar, with no trailing gap to close it.
    if run > 0 {
        rects.push(RectPath::bar(columns - run, run, options));
    }

    CompiledBarcode {
        rects,
        total_width: columns as f64 * options.bar_width,
        bar_height: options.bar_height,
        columns,
    }
}
