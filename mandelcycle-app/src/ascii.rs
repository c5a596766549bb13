//! Text previews for terminals: the escape grid as printable characters,
//! a painted frame as ANSI truecolor cells, and the color table as hex
//! triples.

use std::fmt::Write as _;

use mandelcycle_core::DID_NOT_ESCAPE;
use mandelcycle_render::{ColorTable, PixelGrid, RenderBuffer};

const FIRST_PRINTABLE: u32 = 0x20;
const PRINTABLE_SPAN: u32 = 0x7E - 0x20;

/// Printable character for one escape count.
fn glyph(value: u32, max_iterations: u32) -> char {
    let value = if value == DID_NOT_ESCAPE {
        max_iterations
    } else {
        value
    };
    // Always in 0x20..0x7E.
    char::from_u32(FIRST_PRINTABLE + value % PRINTABLE_SPAN).unwrap_or(' ')
}

/// One character per cell and one line per row, keeping only every
/// `step`-th row and column so a large grid fits a terminal. A `step` of
/// zero is treated as one.
pub(crate) fn render(grid: &PixelGrid, step: u32) -> String {
    let step = step.max(1) as usize;
    let size = grid.size() as usize;
    let max = grid.max_iterations();
    let side = size.div_ceil(step);
    let mut out = String::with_capacity(side * (side + 1));
    for row in grid.values().chunks(size.max(1)).step_by(step) {
        out.extend(row.iter().step_by(step).map(|&v| glyph(v, max)));
        out.push('\n');
    }
    out
}

/// A painted frame as two-column background-colored cells, sampled like
/// [`render`]. Each line ends with an attribute reset.
pub(crate) fn truecolor(buffer: &RenderBuffer, step: u32) -> String {
    let step = step.max(1) as usize;
    let mut out = String::new();
    for y in (0..buffer.height).step_by(step) {
        for x in (0..buffer.width).step_by(step) {
            if let Some(c) = buffer.rgb_at(x, y) {
                let _ = write!(out, "\x1b[48;2;{};{};{}m  ", c.r, c.g, c.b);
            }
        }
        out.push_str("\x1b[0m\n");
    }
    out
}

/// The color table as `#rrggbb` entries, `per_line` to a line.
pub(crate) fn strip(table: &ColorTable, per_line: usize) -> String {
    let per_line = per_line.max(1);
    let mut out = String::new();
    for line in table.entries().chunks(per_line) {
        let hex: Vec<String> = line
            .iter()
            .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
            .collect();
        out.push_str(&hex.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelcycle_core::Viewport;
    use mandelcycle_render::{ColorComponent, Engine, EngineConfig, Rgb};

    fn grid(size: u32, max_iterations: u32) -> PixelGrid {
        let engine = Engine::new(EngineConfig {
            size_in_pixels: size,
            max_iterations,
            workers: 2,
        })
        .unwrap();
        engine.compute(&Viewport::initial()).unwrap()
    }

    #[test]
    fn glyphs_wrap_in_printable_range() {
        assert_eq!(glyph(0, 10), ' ');
        assert_eq!(glyph(1, 10), '!');
        assert_eq!(glyph(PRINTABLE_SPAN, 10), ' ');
        assert_eq!(glyph(DID_NOT_ESCAPE, 10), '*');
    }

    #[test]
    fn one_line_per_row() {
        let text = render(&grid(8, 10), 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|l| l.chars().count() == 8));
        // Top-left corner (-2, -2) escapes before the first step.
        assert!(lines[0].starts_with(' '));
        // The centre, c = 0, never escapes.
        assert_eq!(lines[4].chars().nth(4), Some('*'));
    }

    #[test]
    fn sampling_shrinks_output() {
        let text = render(&grid(10, 10), 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.chars().count() == 4));
        assert_eq!(render(&grid(4, 10), 0), render(&grid(4, 10), 1));
    }

    #[test]
    fn truecolor_emits_painted_cells() {
        let mut table = ColorTable::new(10);
        table.rebuild(
            ColorComponent::hue(0.0, 0.0, 0.0),
            ColorComponent::saturation(0.0, 0.0, 0.0),
            ColorComponent::brightness(0.0, 0.0, 0.0),
            |_, _, _| Rgb::new(1, 2, 3),
        );
        let buffer = table.paint(&grid(4, 10));
        let text = truecolor(&buffer, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.ends_with("\x1b[0m")));
        // (0, 0) has count 0 and paints white; (2, 2) is interior and black.
        assert!(lines[0].starts_with("\x1b[48;2;255;255;255m  "));
        assert!(lines[1].contains("\x1b[48;2;0;0;0m  \x1b[0m"));
        assert_eq!(lines[0].matches("\x1b[48;2;").count(), 2);
    }

    #[test]
    fn strip_formats_hex() {
        let mut table = ColorTable::new(3);
        table.rebuild(
            ColorComponent::hue(0.0, 0.0, 0.0),
            ColorComponent::saturation(0.0, 0.0, 0.0),
            ColorComponent::brightness(0.0, 0.0, 0.0),
            |_, _, _| Rgb::new(255, 0, 16),
        );
        assert_eq!(strip(&table, 2), "#ff0010 #ff0010\n#ff0010\n");
    }
}
