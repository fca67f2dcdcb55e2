//! # Render Tests
//!
//! End-to-end checks of the render cycle: encoder → path compiler → fit
//! policy → SVG/PNG output, plus the failure routing at the boundary.

use barpath::barcode::{Barcode, BarcodeOptions};
use barpath::error::{BarcodeError, ErrorKind};
use barpath::render::{fit, path, raster, svg};
use barpath::symbology::{EncodeOptions, Encoded, EncodedSegment, Encoder, Registry};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encoder that emits a fixed multi-segment symbol regardless of value.
struct Segmented;

impl Encoder for Segmented {
    fn format(&self) -> &str {
        "SEGMENTED"
    }

    fn valid(&self) -> bool {
        true
    }

    fn encode(&self) -> Encoded {
        Encoded::Multi(vec![
            EncodedSegment::bits("11"),
            EncodedSegment::new("1", "01"),
            EncodedSegment::new("23", "001"),
        ])
    }
}

fn registry() -> Arc<Registry> {
    let mut registry = Registry::builtin();
    registry.register("SEGMENTED", |_, _| Ok(Box::new(Segmented)));
    Arc::new(registry)
}

fn options(value: &str, format: &str) -> BarcodeOptions {
    BarcodeOptions {
        value: value.into(),
        format: format.into(),
        ..Default::default()
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[test]
fn multi_segment_data_is_concatenated_before_compiling() {
    let mut barcode = Barcode::with_registry(
        BarcodeOptions {
            width: 2.0,
            height: 50.0,
            ..options("123", "SEGMENTED")
        },
        registry(),
    );
    let frame = barcode.render(500.0).unwrap().unwrap();

    // "11" + "01" + "001" = "1101001"
    assert_eq!(frame.geometry.total_width, 14.0);
    assert_eq!(frame.fit.scale, 1.0);
    assert_eq!(frame.encoded_text, "123");
    assert_eq!(
        frame.geometry.commands(),
        vec![
            "M0,0h4v50h-4z".to_string(),
            "M6,0h2v50h-2z".to_string(),
            "M12,0h2v50h-2z".to_string(),
        ]
    );
}

#[test]
fn ean13_geometry_covers_every_module() {
    let mut barcode = Barcode::new(BarcodeOptions {
        width: 1.0,
        ..options("5901234123457", "EAN13")
    });
    let frame = barcode.render(500.0).unwrap().unwrap();
    let geometry = &frame.geometry;

    assert_eq!(geometry.columns, 95);
    assert_eq!(geometry.total_width, 95.0);

    let bits = Registry::builtin()
        .encode("EAN13", "5901234123457", &EncodeOptions::default())
        .unwrap()
        .data();
    let ink: f64 = geometry.rects.iter().map(|r| r.width).sum();
    assert_eq!(ink, bits.chars().filter(|&c| c == '1').count() as f64);

    // Start guard "101" opens with a one-module bar at x = 0.
    assert_eq!(geometry.rects[0].x, 0.0);
    assert_eq!(geometry.rects[0].width, 1.0);
    // End guard closes with a bar touching the right edge.
    let last = geometry.rects.last().unwrap();
    assert_eq!(last.x + last.width, 95.0);
}

#[test]
fn compile_matches_direct_call() {
    let bits = Registry::builtin()
        .encode("CODE128", "barpath", &EncodeOptions::default())
        .unwrap()
        .data();
    let direct = path::compile(
        &bits,
        path::GeometryOptions {
            bar_width: 3.0,
            bar_height: 40.0,
        },
    );

    let mut barcode = Barcode::new(BarcodeOptions {
        width: 3.0,
        height: 40.0,
        ..options("barpath", "CODE128")
    });
    let frame = barcode.render(10_000.0).unwrap().unwrap();
    assert_eq!(*frame.geometry, direct);
}

// ============================================================================
// FIT POLICY
// ============================================================================

#[test]
fn wide_barcode_is_shrunk_into_viewport() {
    let mut barcode = Barcode::new(options("ABCDEFGHIJ", "CODE39"));
    let natural = barcode.render(100_000.0).unwrap().unwrap();
    let total = natural.geometry.total_width;

    let viewport = total * 0.8;
    let shrunk = barcode.render(viewport).unwrap().unwrap();
    assert!((shrunk.fit.scale - viewport * fit::MARGIN / total).abs() < 1e-9);
    assert!(shrunk.display_width() <= viewport);
    assert!(!shrunk.fit.degraded);
}

#[test]
fn too_long_value_is_reported_through_callback() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut barcode = Barcode::new(options("A-VERY-LONG-CODE-39-VALUE", "CODE39"))
        .on_error(move |err| sink.lock().unwrap().push(err.to_string()));

    assert!(barcode.render(50.0).unwrap().is_none());
    assert_eq!(*seen.lock().unwrap(), vec!["value_too_long".to_string()]);
}

#[test]
fn too_long_value_without_callback_is_hard_failure() {
    let mut barcode = Barcode::new(options("A-VERY-LONG-CODE-39-VALUE", "CODE39"));
    let err = barcode.render(50.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Legibility);
}

// ============================================================================
// ERROR ROUTING
// ============================================================================

#[test]
fn invalid_format_without_callback_is_hard_failure() {
    let mut barcode = Barcode::new(options("123", "QR"));
    match barcode.render(500.0) {
        Err(BarcodeError::Construction { format, .. }) => assert_eq!(format, "QR"),
        other => panic!("expected construction failure, got {:?}", other.map(|f| f.is_some())),
    }
}

#[test]
fn each_failure_kind_is_distinct_through_callback() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut barcode = Barcode::new(options("123", "QR"))
        .on_error(move |err| sink.lock().unwrap().push(err.kind()));

    assert!(barcode.render(500.0).unwrap().is_none());

    barcode.set_options(options("5901234123458", "EAN13"));
    assert!(barcode.render(500.0).unwrap().is_none());

    barcode.set_options(options("5901234123457", "EAN13"));
    assert!(barcode.render(60.0).unwrap().is_none());

    assert!(barcode.render(500.0).unwrap().is_some());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ErrorKind::Construction,
            ErrorKind::Validation,
            ErrorKind::Legibility,
        ]
    );
}

// ============================================================================
// OUTPUT
// ============================================================================

#[test]
fn svg_document_for_literal_symbol() {
    let mut barcode = Barcode::with_registry(
        BarcodeOptions {
            width: 2.0,
            height: 50.0,
            line_color: "#123456".into(),
            ..options("123", "SEGMENTED")
        },
        registry(),
    );
    let frame = barcode.render(500.0).unwrap().unwrap();
    assert_eq!(
        svg::to_svg(&frame),
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"34\" height=\"70\" viewBox=\"0 0 34 70\">",
            "<rect width=\"34\" height=\"70\" fill=\"#ffffff\"/>",
            "<path transform=\"translate(10,10)\" fill=\"#123456\" ",
            "d=\"M0,0h4v50h-4zM6,0h2v50h-2zM12,0h2v50h-2z\"/>",
            "</svg>"
        )
    );
}

#[test]
fn svg_label_matches_bar_width() {
    let mut barcode = Barcode::with_registry(
        BarcodeOptions {
            width: 2.0,
            height: 50.0,
            line_color: "#123456".into(),
            text: Some("1<2".into()),
            ..options("123", "SEGMENTED")
        },
        registry(),
    );
    let frame = barcode.render(500.0).unwrap().unwrap();
    assert_eq!(
        svg::to_svg(&frame),
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"34\" height=\"92\" viewBox=\"0 0 34 92\">",
            "<rect width=\"34\" height=\"92\" fill=\"#ffffff\"/>",
            "<path transform=\"translate(10,10)\" fill=\"#123456\" ",
            "d=\"M0,0h4v50h-4zM6,0h2v50h-2zM12,0h2v50h-2z\"/>",
            "<text x=\"17\" y=\"82\" text-anchor=\"middle\" font-family=\"monospace\" ",
            "font-size=\"20\" fill=\"#000000\" textLength=\"14\" ",
            "lengthAdjust=\"spacingAndGlyphs\">1&lt;2</text>",
            "</svg>"
        )
    );
}

#[test]
fn png_output_is_scaled() {
    let mut barcode = Barcode::new(options("ABCDEFGHIJ", "CODE39"));
    let natural = barcode.render(100_000.0).unwrap().unwrap();
    let (w, _) = svg::natural_size(&natural);

    let viewport = natural.geometry.total_width * 0.8;
    let shrunk = barcode.render(viewport).unwrap().unwrap();
    let img = raster::to_image(&shrunk).unwrap();
    assert_eq!(img.width(), (w * shrunk.fit.scale).round() as u32);

    let png = raster::to_png(&shrunk).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
}
