//! SVG output for a rendered [`Frame`].
//!
//! The document draws the natural-size barcode inside a `viewBox`; the
//! outer `width`/`height` carry the fit scale, so both axes shrink together.
//!
//! ```text
//! ┌───────────── padding ─────────────┐
//! │  ▌▌ ▌ ▌▌▌ ▌  ▌▌ ▌▌▌ ▌ ▌▌  (bars)   │
//! │            label text              │
//! └────────────────────────────────────┘
//! ```

use std::fmt::Write;

use crate::barcode::Frame;

/// Blank space around the symbol, in natural units.
pub const PADDING: f64 = 10.0;

/// Natural (unscaled) document size including padding and label.
pub fn natural_size(frame: &Frame) -> (f64, f64) {
    let label_height = match frame.label {
        Some(_) => frame.style.text_margin + frame.style.font_size,
        None => 0.0,
    };
    (
        frame.geometry.total_width + 2.0 * PADDING,
        frame.geometry.bar_height + label_height + 2.0 * PADDING,
    )
}

/// Render the frame as a standalone SVG document.
pub fn to_svg(frame: &Frame) -> String {
    let (width, height) = natural_size(frame);
    let scale = frame.fit.scale;
    let style = &frame.style;

    let mut svg = String::new();
    write!(
        svg,
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
            "width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">"
        ),
        width * scale,
        height * scale,
        width,
        height
    )
    .unwrap();
    write!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
        width, height, style.background
    )
    .unwrap();
    if !frame.geometry.is_empty() {
        write!(
            svg,
            "<path transform=\"translate({},{})\" fill=\"{}\" d=\"{}\"/>",
            PADDING,
            PADDING,
            style.line_color,
            frame.geometry.path_data()
        )
        .unwrap();
    }
    if let Some(label) = &frame.label {
        write!(
            svg,
            concat!(
                "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" ",
                "font-family=\"monospace\" font-size=\"{}\" fill=\"{}\" textLength=\"{}\" ",
                "lengthAdjust=\"spacingAndGlyphs\">{}</text>"
            ),
            PADDING + frame.geometry.total_width / 2.0,
            PADDING + frame.geometry.bar_height + style.text_margin + style.font_size,
            style.font_size,
            style.text_color,
            frame.geometry.total_width,
            escape(label)
        )
        .unwrap();
    }
    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::Style;
    use crate::color::Color;
    use crate::render::fit::FitResult;
    use crate::render::path::{GeometryOptions, compile};
    use std::sync::Arc;

    fn frame(bits: &str, label: Option<&str>, scale: f64) -> Frame {
        Frame {
            geometry: Arc::new(compile(
                bits,
                GeometryOptions {
                    bar_width: 2.0,
                    bar_height: 50.0,
                },
            )),
            fit: FitResult {
                scale,
                degraded: false,
            },
            label: label.map(str::to_string),
            encoded_text: String::new(),
            style: Style {
                line_color: Color::BLACK,
                text_color: Color { r: 0x11, g: 0x22, b: 0x33 },
                background: Color::WHITE,
                font_size: 20.0,
                text_margin: 2.0,
            },
        }
    }

    #[test]
    fn test_path_and_background() {
        let svg = to_svg(&frame("1101", None, 1.0));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"28\" height=\"70\""));
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(svg.contains("d=\"M0,0h4v50h-4zM6,0h2v50h-2z\""));
        assert!(!svg.contains("<text"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_scale_applies_to_outer_size() {
        let svg = to_svg(&frame("1101", None, 0.5));
        assert!(svg.contains("width=\"14\" height=\"35\" viewBox=\"0 0 28 70\""));
    }

    #[test]
    fn test_label_is_escaped_and_centered() {
        let svg = to_svg(&frame("1101", Some("A&B <1>"), 1.0));
        assert!(svg.contains("A&amp;B &lt;1&gt;"));
        assert!(svg.contains("x=\"14\""));
        assert!(svg.contains("y=\"82\""));
        assert!(svg.contains("textLength=\"8\""));
        assert!(svg.contains("fill=\"#112233\""));
        assert_eq!(natural_size(&frame("1101", Some("x"), 1.0)), (28.0, 92.0));
    }

    #[test]
    fn test_empty_geometry_has_no_path() {
        let svg = to_svg(&frame("", None, 1.0));
        assert!(!svg.contains("<path"));
    }
}
