//! The five enhancement transforms: denoise, sharpen, saturate, gamma, edges

use imageproc::image::{Rgb, RgbImage};

use super::color::{hsv_to_rgb, rgb_to_hsv};
use super::filter;

const BILATERAL_DIAMETER: u32 = 9;
const BILATERAL_SIGMA_COLOR: f32 = 75.0;
const BILATERAL_SIGMA_SPACE: f32 = 75.0;

const UNSHARP_SIGMA: f64 = 5.0;
const UNSHARP_IMAGE_WEIGHT: f32 = 2.5;
const UNSHARP_BLUR_WEIGHT: f32 = -1.5;

const SATURATION_FACTOR: f32 = 1.5;

// > 1 darkens midtones
const GAMMA: f64 = 1.5;

/// Gamma lookup table, built once
static GAMMA_LUT: std::sync::OnceLock<[u8; 256]> = std::sync::OnceLock::new();

fn gamma_lut() -> &'static [u8; 256] {
    GAMMA_LUT.get_or_init(|| {
        let mut lut = [0u8; 256];
        for (i, pixel) in lut.iter_mut().enumerate() {
            let normalized = i as f64 / 255.0;
            // truncate, not round
            *pixel = (normalized.powf(GAMMA) * 255.0) as u8;
        }
        lut
    })
}

/// Edge-preserving smoothing: diameter 9, sigma 75 for both colour and space
pub(super) fn bilateral_filtering(img: &RgbImage) -> RgbImage {
    filter::bilateral(
        img,
        BILATERAL_DIAMETER,
        BILATERAL_SIGMA_COLOR,
        BILATERAL_SIGMA_SPACE,
    )
}

/// `2.5 * image - 1.5 * gaussian(image, sigma = 5)`, saturated to `u8`
pub(super) fn unsharp_masking(img: &RgbImage) -> RgbImage {
    let blurred = filter::gaussian_blur(img, UNSHARP_SIGMA);

    let mut out = img.clone();
    for (dst, blur) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let weighted =
                dst[c] as f32 * UNSHARP_IMAGE_WEIGHT + blur[c] as f32 * UNSHARP_BLUR_WEIGHT;
            dst[c] = filter::saturate_u8(weighted);
        }
    }

    out
}

/// Scale the HSV saturation by 1.5 and convert back.
///
/// The scaled saturation is truncated and clamped at 255 before the
/// conversion back.
pub(super) fn saturation_enhancement(img: &RgbImage) -> RgbImage {
    imageproc::map::map_colors(img, |pixel| {
        let mut hsv = rgb_to_hsv(pixel);
        hsv[1] = (hsv[1] as f32 * SATURATION_FACTOR).min(255.0) as u8;
        hsv_to_rgb(hsv)
    })
}

/// `trunc((v / 255) ^ 1.5 * 255)` per channel
pub(super) fn gamma_correction(img: &RgbImage) -> RgbImage {
    let lut = gamma_lut();
    imageproc::map::map_colors(img, |Rgb([r, g, b])| {
        Rgb([lut[r as usize], lut[g as usize], lut[b as usize]])
    })
}

/// Subtract the Laplacian, then min-max stretch every sample into `0..=255`.
///
/// A constant difference (flat input) has no range to stretch and maps to 0.
pub(super) fn edge_enhancement(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let laplacian = filter::laplacian(img);

    let sharpened: Vec<f64> = img
        .as_raw()
        .iter()
        .zip(&laplacian)
        .map(|(&v, &lap)| v as f64 - lap)
        .collect();

    let (min, max) = sharpened
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    let scale = if range > f64::EPSILON { 255.0 / range } else { 0.0 };
    let shift = -min * scale;

    log::trace!("Laplacian range [{min}, {max}], scale {scale}");

    let data = sharpened
        .into_iter()
        .map(|v| (v * scale + shift).clamp(0.0, 255.0) as u8)
        .collect();

    RgbImage::from_raw(width, height, data)
        .expect("Buffer length matches the source dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(12, 7, Rgb(rgb))
    }

    fn gradient() -> RgbImage {
        RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
        })
    }

    #[test]
    fn bilateral_leaves_uniform_image_unchanged() {
        let img = solid([40, 130, 220]);
        assert_eq!(bilateral_filtering(&img), img);
    }

    #[test]
    fn unsharp_leaves_uniform_image_unchanged() {
        let img = solid([40, 130, 220]);
        assert_eq!(unsharp_masking(&img), img);
    }

    #[test]
    fn unsharp_saturates_overshoot() {
        let mut img = solid([250, 250, 250]);
        for y in 2..5 {
            for x in 5..8 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        let out = unsharp_masking(&img);
        // the dark block undershoots below zero and clamps
        assert_eq!(out.get_pixel(6, 3), &Rgb([0, 0, 0]));
        // bright neighbours overshoot above 255 and clamp
        assert_eq!(out.get_pixel(4, 3), &Rgb([255, 255, 255]));
    }

    #[test]
    fn unsharp_weights_on_gentle_step() {
        let img = RgbImage::from_fn(61, 1, |x, _| {
            let v = if x < 30 { 100 } else { 120 };
            Rgb([v, v, v])
        });
        let out = unsharp_masking(&img);

        // blurred is 108 at x = 28 and 112 at x = 31
        // 2.5 * 100 - 1.5 * 108 = 88
        assert_eq!(out.get_pixel(28, 0), &Rgb([88, 88, 88]));
        // 2.5 * 120 - 1.5 * 112 = 132
        assert_eq!(out.get_pixel(31, 0), &Rgb([132, 132, 132]));
    }

    #[test]
    fn bilateral_averages_small_colour_steps() {
        // 6x6 block of 110 on a 100 background
        let img = RgbImage::from_fn(20, 20, |x, y| {
            let inside = (7..13).contains(&x) && (7..13).contains(&y);
            let v = if inside { 110 } else { 100 };
            Rgb([v, v, v])
        });
        let out = bilateral_filtering(&img);

        // 107.30 over the circular window of radius 4 with sigma_space 75
        assert_eq!(out.get_pixel(10, 10), &Rgb([107, 107, 107]));
        // 106.31 one step off the centre
        assert_eq!(out.get_pixel(9, 8), &Rgb([106, 106, 106]));
        // untouched far from the block
        assert_eq!(out.get_pixel(0, 0), &Rgb([100, 100, 100]));
    }

    #[test]
    fn saturation_leaves_gray_unchanged() {
        let img = RgbImage::from_fn(8, 8, |x, y| {
            let v = (x * 30 + y) as u8;
            Rgb([v, v, v])
        });
        assert_eq!(saturation_enhancement(&img), img);
    }

    #[test]
    fn saturation_spreads_channels() {
        let img = solid([160, 120, 100]);
        let out = saturation_enhancement(&img);
        let p = out.get_pixel(0, 0);
        // value is preserved, the minimum channel drops
        assert_eq!(p[0], 160);
        assert!(p[2] < 100);
    }

    #[test]
    fn saturation_clamps_at_full() {
        let img = solid([200, 10, 10]);
        let out = saturation_enhancement(&img);
        assert_eq!(out.get_pixel(0, 0), &Rgb([200, 0, 0]));
    }

    #[test]
    fn gamma_fixed_points() {
        assert_eq!(gamma_correction(&solid([255, 255, 255])), solid([255, 255, 255]));
        assert_eq!(gamma_correction(&solid([0, 0, 0])), solid([0, 0, 0]));
    }

    #[test]
    fn gamma_truncates_midtones() {
        // (128 / 255) ^ 1.5 * 255 = 90.68...
        let out = gamma_correction(&solid([128, 64, 1]));
        assert_eq!(out.get_pixel(0, 0), &Rgb([90, 32, 0]));
    }

    #[test]
    fn edge_on_uniform_image_is_zero() {
        let out = edge_enhancement(&solid([90, 90, 90]));
        assert!(out.as_raw().iter().all(|&v| v == 0));
        assert_eq!(out.dimensions(), (12, 7));
    }

    #[test]
    fn edge_subtracts_laplacian_and_stretches_all_channels_together() {
        // red: 10 with a 15 centre; green flat 0; blue flat 51
        let mut img = RgbImage::from_pixel(3, 3, Rgb([10, 0, 51]));
        img.put_pixel(1, 1, Rgb([15, 0, 51]));
        let out = edge_enhancement(&img);

        // red before stretching: corners 10, edge centres 0, centre 35
        // joint range [0, 51] gives scale 5
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(out.get_pixel(x, y), &Rgb([50, 0, 255]), "({x}, {y})");
        }
        for (x, y) in [(1, 0), (0, 1), (2, 1), (1, 2)] {
            assert_eq!(out.get_pixel(x, y), &Rgb([0, 0, 255]), "({x}, {y})");
        }
        assert_eq!(out.get_pixel(1, 1), &Rgb([175, 0, 255]));
    }

    #[test]
    fn edge_spans_full_range() {
        let out = edge_enhancement(&gradient());
        let raw = out.as_raw();
        assert_eq!(raw.iter().copied().min(), Some(0));
        // truncation may land the maximum a hair under 255
        assert!(raw.iter().copied().max().unwrap() >= 254);
    }

    #[test]
    fn input_is_never_mutated() {
        let img = gradient();
        let copy = img.clone();
        let _ = bilateral_filtering(&img);
        let _ = unsharp_masking(&img);
        let _ = saturation_enhancement(&img);
        let _ = gamma_correction(&img);
        let _ = edge_enhancement(&img);
        assert_eq!(img, copy);
    }
}
