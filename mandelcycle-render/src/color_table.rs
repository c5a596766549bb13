use tracing::debug;

use crate::buffer::RenderBuffer;
use crate::grid::PixelGrid;
use crate::oscillator::ColorComponent;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// An opaque 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

// ---------------------------------------------------------------------------
// Color table
// ---------------------------------------------------------------------------

/// Fixed-size lookup from escape count to color.
///
/// Slot `v - 1` holds the color for count `v`. Count `0` (outside the
/// bailout circle before any step) is reserved white, and any count past the
/// table, including the did-not-escape sentinel, is black.
///
/// The table is long-lived: [`rebuild`](Self::rebuild) overwrites every
/// slot in place and never resizes. Rebuilding takes `&mut self`, so no
/// reader can observe a half-filled pass.
#[derive(Debug, Clone)]
pub struct ColorTable {
    entries: Vec<Rgb>,
}

impl ColorTable {
    /// A table of `len` slots, all black until the first rebuild.
    pub fn new(len: usize) -> Self {
        Self {
            entries: vec![Rgb::BLACK; len],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw slots, for drawing a preview strip of the palette.
    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    /// Refill every slot by sampling the three oscillators.
    ///
    /// Each slot gets `to_rgb(h, s, b)` of the current normalised values,
    /// then all three oscillators advance one step in lock-step.
    pub fn rebuild<F>(
        &mut self,
        mut hue: ColorComponent,
        mut saturation: ColorComponent,
        mut brightness: ColorComponent,
        to_rgb: F,
    ) where
        F: Fn(f32, f32, f32) -> Rgb,
    {
        for slot in self.entries.iter_mut() {
            *slot = to_rgb(
                hue.normalized(),
                saturation.normalized(),
                brightness.normalized(),
            );
            hue.next();
            saturation.next();
            brightness.next();
        }
        debug!(
            len = self.entries.len(),
            hue_end = hue.value(),
            saturation_end = saturation.value(),
            brightness_end = brightness.value(),
            "Color table rebuilt"
        );
    }

    /// Color for an escape count.
    #[inline]
    pub fn lookup(&self, count: u32) -> Rgb {
        if count == 0 {
            return Rgb::WHITE;
        }
        match self.entries.get(count as usize - 1) {
            Some(&color) => color,
            None => Rgb::BLACK,
        }
    }

    /// Paint a whole grid into an RGBA buffer by visiting every cell.
    pub fn paint(&self, grid: &PixelGrid) -> RenderBuffer {
        let mut buffer = RenderBuffer::new(grid.size(), grid.size());
        grid.visit(|x, y, count| buffer.put(x, y, self.lookup(count)));
        buffer
    }
}
