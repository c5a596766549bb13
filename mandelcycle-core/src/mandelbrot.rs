use crate::complex::Complex;
use crate::fractal::{
    validate_max_iterations, EscapeTime, DEFAULT_MAX_ITERATIONS, DID_NOT_ESCAPE, ESCAPE_RADIUS_SQ,
};

/// The Mandelbrot recurrence `z ← z² + c`, seeded with `z = c`.
///
/// The bailout test runs on the previous step's output *before* the update,
/// so a point already outside the circle reports `0`. Renderings only match
/// across implementations if this ordering is kept exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mandelbrot {
    max_iterations: u32,
}

impl Mandelbrot {
    pub fn new(max_iterations: u32) -> crate::Result<Self> {
        let max_iterations = validate_max_iterations(max_iterations)?;
        Ok(Self { max_iterations })
    }
}

impl Default for Mandelbrot {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl EscapeTime for Mandelbrot {
    #[inline]
    fn escape_time(&self, c: Complex) -> u32 {
        let mut z_re = c.re;
        let mut z_im = c.im;
        for i in 0..=self.max_iterations {
            let re_sq = z_re * z_re;
            let im_sq = z_im * z_im;
            if re_sq + im_sq >= ESCAPE_RADIUS_SQ {
                return i;
            }
            let next_re = re_sq - im_sq + c.re;
            z_im = 2.0 * z_re * z_im + c.im;
            z_re = next_re;
        }
        DID_NOT_ESCAPE
    }

    #[inline]
    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}
