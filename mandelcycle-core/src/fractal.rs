use crate::complex::Complex;
use crate::error::CoreError;

/// Sentinel escape count for points that stayed bounded for the whole
/// iteration budget.
///
/// It compares greater than every valid count, so a color lookup can treat
/// it like any other count that overflows the table.
pub const DID_NOT_ESCAPE: u32 = u32::MAX;

/// Squared bailout radius. An orbit with `|z|² >= 4` has escaped.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Default iteration budget, also the length of the color table.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Check that `max_iterations` leaves room for the sentinel.
///
/// The bound is inclusive (`0..=max_iterations` trial steps), so the largest
/// count a kernel can report is `max_iterations` itself and it must never
/// collide with [`DID_NOT_ESCAPE`].
pub fn validate_max_iterations(max_iterations: u32) -> crate::Result<u32> {
    if max_iterations >= DID_NOT_ESCAPE {
        return Err(CoreError::InvalidMaxIterations(max_iterations));
    }
    Ok(max_iterations)
}

/// An escape-time kernel: maps a point of the complex plane to the
/// iteration count at which its orbit left the bailout circle.
///
/// Designed for **static dispatch**. The engine is generic over
/// `K: EscapeTime` so the hot loop is inlined. An accelerated kernel is a
/// drop-in implementation and must report the same counts as
/// [`Mandelbrot`](crate::Mandelbrot).
pub trait EscapeTime {
    /// Escape count in `0..=max_iterations`, or [`DID_NOT_ESCAPE`].
    fn escape_time(&self, c: Complex) -> u32;

    /// The inclusive iteration bound this kernel runs to.
    fn max_iterations(&self) -> u32;
}
