//! Value-to-colour mapping for the waterfall.
//!
//! Squaring the normalized magnitude pushes the noise floor towards black and
//! spends most of the hue excursion on the loud end of the range.

/// Fixed saturation of every waterfall colour
pub const SATURATION: f64 = 0.8;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the colour as `0x00BBGGRR`, the byte order of a little-endian
    /// RGBA pixel buffer.
    pub fn packed(self) -> u32 {
        u32::from(self.r) | (u32::from(self.g) << 8) | (u32::from(self.b) << 16)
    }
}

/// Maps a normalized magnitude to a waterfall colour.
///
/// Hue is `(colour_offset + value² * colour_range) mod 1`, brightness is
/// `value²`. `value` is clamped into [0, 1] first; NaN is treated as silence.
/// The arithmetic runs in `f64` and is narrowed only per channel.
pub fn colour(value: f32, colour_offset: f32, colour_range: f32) -> Rgb8 {
    let value = if value.is_nan() {
        0.0
    } else {
        f64::from(value.clamp(0.0, 1.0))
    };
    let intensity = value * value;
    let hue = (f64::from(colour_offset) + intensity * f64::from(colour_range)).rem_euclid(1.0);

    hsv_to_rgb(hue, SATURATION, intensity)
}

/// Six-sector HSV to RGB conversion. All inputs are expected in [0, 1];
/// channels are scaled to 255 and truncated.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb8 {
    let (r, g, b) = if saturation <= 0.0 {
        (value, value, value)
    } else {
        let scaled = hue * 6.0;
        let sector = scaled.floor();
        let fraction = scaled - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * fraction);
        let t = value * (1.0 - saturation * (1.0 - fraction));

        match (sector as i32).rem_euclid(6) {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        }
    };

    Rgb8::new(channel(r), channel(g), channel(b))
}

fn channel(component: f64) -> u8 {
    // `as` saturates into 0..=255 and truncates the fraction
    (component * 255.0) as u8
}
