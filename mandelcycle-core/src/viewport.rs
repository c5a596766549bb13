use crate::complex::Complex;
use crate::error::CoreError;

/// A square region of the complex plane sampled into a square pixel grid.
///
/// The region is `span` units wide and tall and centred on `center`.
/// Pixel `(0, 0)` is the corner with the smallest real and imaginary parts,
/// and both axes grow with the pixel index (the imaginary axis is not
/// flipped). A viewport is never mutated. Navigation always derives a new one.
///
/// The human-readable `label` is derived once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center: Complex,
    span: f64,
    label: String,
}

impl Viewport {
    /// Span of the starting view: the whole set fits in `[-2, 2] × [-2, 2]`.
    pub const INITIAL_SPAN: f64 = 4.0;

    /// The canonical starting region: centre `0 + 0i`, span 4.
    pub fn initial() -> Self {
        Self::from_parts(Complex::ZERO, Self::INITIAL_SPAN)
    }

    /// Create a viewport with explicit parameters.
    pub fn new(center: Complex, span: f64) -> crate::Result<Self> {
        if !center.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("center must be finite, got {center}"),
            });
        }
        if span <= 0.0 || !span.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("span must be positive and finite, got {span}"),
            });
        }
        Ok(Self::from_parts(center, span))
    }

    fn from_parts(center: Complex, span: f64) -> Self {
        let label = format!(
            "Center: ({}, {}) width/height: {}",
            format_trimmed(center.re),
            format_trimmed(center.im),
            format_trimmed(span)
        );
        Self {
            center,
            span,
            label,
        }
    }

    #[inline]
    pub fn center(&self) -> Complex {
        self.center
    }

    /// Width (and height) of the region in complex-plane units.
    #[inline]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Human-readable description, e.g. `Center: (0, 0) width/height: 4`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The corner mapped from pixel `(0, 0)`.
    #[inline]
    pub fn min_corner(&self) -> Complex {
        let half = self.span / 2.0;
        Complex::new(self.center.re - half, self.center.im - half)
    }

    /// Map a pixel of a `size × size` grid to a point on the complex plane.
    ///
    /// `re = (center.re - span/2) + span * px / size`, symmetric for `im`.
    /// The evaluation order is fixed so every caller (engine, navigation)
    /// lands on bit-identical coordinates.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32, size: u32) -> Complex {
        let min = self.min_corner();
        let size = size as f64;
        Complex::new(
            min.re + self.span * px as f64 / size,
            min.im + self.span * py as f64 / size,
        )
    }

    /// Inverse of [`pixel_to_complex`](Self::pixel_to_complex), returning
    /// fractional pixel coordinates.
    pub fn complex_to_pixel(&self, point: Complex, size: u32) -> (f64, f64) {
        let offset = point - self.min_corner();
        let pixels_per_unit = size as f64 / self.span;
        (offset.re * pixels_per_unit, offset.im * pixels_per_unit)
    }

    /// Derive the viewport centred on pixel `(px, py)` with its span scaled
    /// by `zoom_factor`.
    ///
    /// Pan is `zoom_factor == 1.0`; zoom in and out use factors below and
    /// above one. The factor must be positive; this is not validated.
    pub fn pan_zoom(&self, px: u32, py: u32, zoom_factor: f64, size: u32) -> Self {
        debug_assert!(zoom_factor > 0.0, "zoom factor must be positive");
        let center = self.pixel_to_complex(px, py, size);
        Self::from_parts(center, self.span * zoom_factor)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Six fixed decimals with trailing zeros (and a bare trailing `.`) removed.
fn format_trimmed(value: f64) -> String {
    let mut s = format!("{value:.6}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    s
}
