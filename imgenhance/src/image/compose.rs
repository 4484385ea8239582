//! Side-by-side comparison of an original and its enhanced version

use imageproc::image::{imageops, Rgb, RgbImage};

/// Original on the left, enhanced on the right, on a black canvas tall
/// enough for both.
pub fn side_by_side(original: &RgbImage, enhanced: &RgbImage) -> RgbImage {
    let (left_width, left_height) = original.dimensions();
    let (right_width, right_height) = enhanced.dimensions();

    let mut canvas = RgbImage::from_pixel(
        left_width + right_width,
        left_height.max(right_height),
        Rgb([0, 0, 0]),
    );
    imageops::overlay(&mut canvas, original, 0, 0);
    imageops::overlay(&mut canvas, enhanced, left_width.into(), 0);

    canvas
}
