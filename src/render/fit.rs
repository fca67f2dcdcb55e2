//! Display-fit scaling.
//!
//! A barcode is never upscaled. When it is wider than the viewport it is
//! shrunk uniformly to [`MARGIN`] of the viewport width; a resulting scale
//! under [`LEGIBILITY_THRESHOLD`] marks the fit as degraded.

use serde::Serialize;

/// Fraction of the viewport a shrunk barcode occupies.
pub const MARGIN: f64 = 0.95;

/// Scales below this are considered unscannable.
pub const LEGIBILITY_THRESHOLD: f64 = 0.5;

/// Uniform scale for both axes plus the legibility signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitResult {
    pub scale: f64,
    pub degraded: bool,
}

impl FitResult {
    pub const NATURAL: FitResult = FitResult {
        scale: 1.0,
        degraded: false,
    };
}

/// Compute the scale that fits `total_width` into `viewport_width`.
pub fn fit(total_width: f64, viewport_width: f64) -> FitResult {
    if viewport_width - total_width >= 0.0 || total_width <= 0.0 {
        return FitResult::NATURAL;
    }

    let scale = (viewport_width.max(0.0) * MARGIN) / total_width;
    FitResult {
        scale,
        degraded: scale < LEGIBILITY_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fits_as_is() {
        assert_eq!(fit(100.0, 200.0), FitResult::NATURAL);
        assert_eq!(fit(14.0, 500.0), FitResult::NATURAL);
    }

    #[test]
    fn test_exact_fit_is_not_scaled() {
        assert_eq!(fit(320.0, 320.0), FitResult::NATURAL);
    }

    #[test]
    fn test_shrinks_with_margin() {
        let r = fit(150.0, 100.0);
        assert!(close(r.scale, 95.0 / 150.0));
        assert!(!r.degraded);
    }

    #[test]
    fn test_degraded_below_half() {
        let r = fit(200.0, 100.0);
        assert!(close(r.scale, 0.475));
        assert!(r.degraded);
    }

    #[test]
    fn test_threshold_boundary() {
        // 95 / 190 lands exactly on the threshold
        let r = fit(190.0, 100.0);
        assert!(close(r.scale, 0.5));
        assert!(!r.degraded);
    }

    #[test]
    fn test_scale_never_exceeds_one() {
        for (w, v) in [(1.0, 1000.0), (999.0, 1000.0), (1001.0, 1000.0), (5000.0, 10.0)] {
            assert!(fit(w, v).scale <= 1.0);
        }
    }

    #[test]
    fn test_empty_barcode() {
        assert_eq!(fit(0.0, 0.0), FitResult::NATURAL);
        assert_eq!(fit(0.0, -5.0), FitResult::NATURAL);
    }

    #[test]
    fn test_zero_viewport_is_degraded() {
        let r = fit(10.0, 0.0);
        assert!(r.degraded);
        assert_eq!(r.scale, 0.0);
    }
}
