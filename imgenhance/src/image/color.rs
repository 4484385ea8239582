//! 8-bit HSV conversions
//!
//! Hue is stored in half degrees (`0..180`) so it fits a byte, saturation
//! and value span `0..=255`.

use imageproc::image::Rgb;

/// Hue range of the 8-bit encoding.
const HUE_RANGE: f32 = 180.0;

pub(super) fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0.0
    } else {
        (255.0 * diff / v as f32).round()
    };

    let h = if diff == 0.0 {
        0.0
    } else {
        // sector offset in units of 60 degrees
        let sector = if v == r {
            (gf - bf) / diff
        } else if v == g {
            (bf - rf) / diff + 2.0
        } else {
            (rf - gf) / diff + 4.0
        };
        let h = (sector * HUE_RANGE / 6.0).round();
        if h < 0.0 {
            h + HUE_RANGE
        } else {
            h
        }
    };

    // hue can round up to exactly one full turn
    let h = if h >= HUE_RANGE { h - HUE_RANGE } else { h };

    [h as u8, s as u8, v]
}

pub(super) fn hsv_to_rgb([h, s, v]: [u8; 3]) -> Rgb<u8> {
    let s = s as f32 / 255.0;
    let v = v as f32 / 255.0;

    let (r, g, b) = if s == 0.0 {
        (v, v, v)
    } else {
        let mut h = h as f32 * 6.0 / HUE_RANGE;
        if h >= 6.0 {
            h -= 6.0;
        }
        let sector = h.floor();
        let f = h - sector;

        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    };

    Rgb([to_byte(r), to_byte(g), to_byte(b)])
}

#[inline]
fn to_byte(unit: f32) -> u8 {
    (unit * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}
