use crate::color_table::Rgb;

/// Convert hue/saturation/brightness in unit range to RGB.
///
/// The hue wraps by its fractional part, so `1.25` is the same color as
/// `0.25`; saturation and brightness are clamped to `[0, 1]`. This is the
/// default converter handed to [`ColorTable::rebuild`](crate::ColorTable::rebuild).
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Rgb {
    let s = unit(saturation);
    let v = unit(brightness);
    if s == 0.0 {
        let gray = to_byte(v);
        return Rgb::new(gray, gray, gray);
    }

    let h = fract01(hue) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

#[inline]
fn fract01(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    let f = x - x.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative inputs.
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

#[inline]
fn unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[inline]
fn to_byte(x: f32) -> u8 {
    (x * 255.0 + 0.5) as u8
}
