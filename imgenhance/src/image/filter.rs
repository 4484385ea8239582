//! Neighbourhood filters: Gaussian blur, Laplacian, bilateral
//!
//! All filters read outside the image through reflect-101 borders
//! (`dcb|abcd|cba`).

use imageproc::image::{Rgb, RgbImage};

const CHANNELS: usize = 3;

/// Map an out-of-range coordinate back into `0..len` with reflect-101.
#[inline]
pub(super) fn reflect101(mut i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * (len - 1) - i;
        } else {
            return i as u32;
        }
    }
}

/// Kernel size used when only sigma is given: covers +-3 sigma, forced odd.
pub(super) fn auto_kernel_size(sigma: f64) -> usize {
    ((sigma * 3.0 * 2.0 + 1.0).round() as usize) | 1
}

/// Normalized 1-D Gaussian kernel of `size` taps.
pub(super) fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    let center = (size as f64 - 1.0) / 2.0;
    let scale = -0.5 / (sigma * sigma);

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Separable Gaussian blur with the same sigma on both axes.
///
/// Kernel size is derived from sigma. Results are rounded to nearest and
/// saturated back to `u8`.
pub(super) fn gaussian_blur(img: &RgbImage, sigma: f64) -> RgbImage {
    let (width, height) = img.dimensions();
    let kernel = gaussian_kernel(auto_kernel_size(sigma), sigma);
    let half = (kernel.len() / 2) as i64;

    // horizontal pass into a float buffer
    let mut horizontal = vec![0f32; (width * height) as usize * CHANNELS];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0f32; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect101(x as i64 + k as i64 - half, width);
                let p = img.get_pixel(sx, y);
                for c in 0..CHANNELS {
                    acc[c] += weight * p[c] as f32;
                }
            }
            let base = ((y * width + x) as usize) * CHANNELS;
            horizontal[base..base + CHANNELS].copy_from_slice(&acc);
        }
    }

    // vertical pass back to u8
    let mut out = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0f32; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect101(y as i64 + k as i64 - half, height);
                let base = ((sy * width + x) as usize) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * horizontal[base + c];
                }
            }
            out.put_pixel(x, y, Rgb(acc.map(saturate_u8)));
        }
    }

    out
}

/// 3x3 Laplacian `[0 1 0; 1 -4 1; 0 1 0]` per channel, at `f64` precision.
///
/// Returned buffer is interleaved `height * width * 3`, row-major.
pub(super) fn laplacian(img: &RgbImage) -> Vec<f64> {
    let (width, height) = img.dimensions();
    let mut out = Vec::with_capacity((width * height) as usize * CHANNELS);

    for y in 0..height {
        for x in 0..width {
            let center = img.get_pixel(x, y);
            let up = img.get_pixel(x, reflect101(y as i64 - 1, height));
            let down = img.get_pixel(x, reflect101(y as i64 + 1, height));
            let left = img.get_pixel(reflect101(x as i64 - 1, width), y);
            let right = img.get_pixel(reflect101(x as i64 + 1, width), y);

            for c in 0..CHANNELS {
                let sum = up[c] as f64 + down[c] as f64 + left[c] as f64 + right[c] as f64;
                out.push(sum - 4.0 * center[c] as f64);
            }
        }
    }

    out
}

/// Edge-preserving smoothing over a circular window of `diameter`.
///
/// The colour distance between two pixels is the sum of the absolute
/// differences of their channels.
pub(super) fn bilateral(
    img: &RgbImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    let (width, height) = img.dimensions();
    let radius = (diameter / 2) as i64;

    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    // every possible L1 distance between two RGB pixels
    let color_weight: Vec<f32> = (0..256 * CHANNELS)
        .map(|d| {
            let d = d as f32;
            (d * d * color_coeff).exp()
        })
        .collect();

    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r = ((dx * dx + dy * dy) as f64).sqrt();
            if r > radius as f64 {
                continue;
            }
            let r = r as f32;
            offsets.push((dx, dy, (r * r * space_coeff).exp()));
        }
    }

    let mut out = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let center = img.get_pixel(x, y);
            let mut sum = [0f32; CHANNELS];
            let mut weight_sum = 0f32;

            for &(dx, dy, space_weight) in &offsets {
                let sx = reflect101(x as i64 + dx, width);
                let sy = reflect101(y as i64 + dy, height);
                let p = img.get_pixel(sx, sy);

                let distance: usize = (0..CHANNELS)
                    .map(|c| p[c].abs_diff(center[c]) as usize)
                    .sum();
                let w = space_weight * color_weight[distance];

                for c in 0..CHANNELS {
                    sum[c] += w * p[c] as f32;
                }
                weight_sum += w;
            }

            out.put_pixel(x, y, Rgb(sum.map(|s| saturate_u8(s / weight_sum))));
        }
    }

    out
}

/// Round half to even and clamp into `0..=255`.
#[inline]
pub(super) fn saturate_u8(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect101_mirrors_without_repeating_edge() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(3, 5), 3);
    }

    #[test]
    fn reflect101_handles_tiny_images() {
        assert_eq!(reflect101(-4, 1), 0);
        assert_eq!(reflect101(4, 1), 0);
        // bounces more than once when the window exceeds the image
        assert_eq!(reflect101(-4, 2), 0);
        assert_eq!(reflect101(5, 2), 1);
    }

    #[test]
    fn auto_kernel_size_for_sigma_five() {
        assert_eq!(auto_kernel_size(5.0), 31);
        assert_eq!(auto_kernel_size(1.0), 7);
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(31, 5.0);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
        }
        assert!(k[15] > k[14]);
    }

    #[test]
    fn blur_spreads_an_impulse_over_the_kernel() {
        let mut img = RgbImage::new(61, 1);
        img.put_pixel(30, 0, Rgb([200, 200, 200]));
        let blurred = gaussian_blur(&img, 5.0);

        // 200 * k[offset] for the normalized 31-tap sigma 5 kernel:
        // 15.99, 9.70, 2.16
        assert_eq!(blurred.get_pixel(30, 0), &Rgb([16, 16, 16]));
        assert_eq!(blurred.get_pixel(35, 0), &Rgb([10, 10, 10]));
        assert_eq!(blurred.get_pixel(25, 0), &Rgb([10, 10, 10]));
        assert_eq!(blurred.get_pixel(40, 0), &Rgb([2, 2, 2]));
        assert_eq!(blurred.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn laplacian_of_single_bright_pixel() {
        let mut img = RgbImage::from_pixel(3, 3, Rgb([10, 10, 10]));
        img.put_pixel(1, 1, Rgb([20, 20, 20]));
        let lap = laplacian(&img);

        // center: 4 * 10 - 4 * 20
        assert_eq!(lap[(3 + 1) * 3], -40.0);
        // top middle: left + right + down + reflected up (down) - 4 * 10
        assert_eq!(lap[3], 10.0 + 10.0 + 20.0 + 20.0 - 40.0);
    }

    #[test]
    fn blur_smooths_a_step() {
        let mut img = RgbImage::from_pixel(20, 1, Rgb([0, 0, 0]));
        for x in 10..20 {
            img.put_pixel(x, 0, Rgb([200, 200, 200]));
        }
        let blurred = gaussian_blur(&img, 5.0);
        let left = blurred.get_pixel(9, 0)[0];
        let right = blurred.get_pixel(10, 0)[0];
        assert!(left > 0 && left < 200);
        assert!(right > left && right < 200);
    }

    #[test]
    fn bilateral_keeps_strong_edges() {
        let mut img = RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]));
        for y in 0..16 {
            for x in 8..16 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let out = bilateral(&img, 9, 75.0, 75.0);
        // colour distance 765 makes the other side's weight vanish
        assert_eq!(out.get_pixel(7, 8), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(8, 8), &Rgb([255, 255, 255]));
    }
}
