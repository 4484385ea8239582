//! Image enhancement: validation, dispatch and the PNG codec around it

mod color;
mod compose;
mod decode;
mod encode;
mod filter;
mod transform;

// Re-export public API
pub use compose::side_by_side;
pub use decode::decode;
pub use encode::{compress_to_png, encode_png, PngCompression};

use imageproc::image::{ColorType, DynamicImage, RgbImage};

use crate::enhancement::Enhancement;
use crate::error::{Error, Result};

/// Apply one enhancement to a decoded image.
///
/// The input must be a non-empty 8-bit RGB image. The result always has the
/// same width, height and channel count as the input, including for
/// [`Enhancement::EdgeEnhancement`].
pub fn enhance(image: &DynamicImage, kind: Enhancement) -> Result<DynamicImage> {
    let rgb = validate(image)?;
    Ok(DynamicImage::ImageRgb8(enhance_rgb(rgb, kind)))
}

/// [`enhance`] with the selector given by label or slug
pub fn enhance_by_label(image: &DynamicImage, label: &str) -> Result<DynamicImage> {
    let kind = Enhancement::try_from(label)?;
    enhance(image, kind)
}

/// Apply one enhancement to an RGB buffer that is known to be non-empty.
pub fn enhance_rgb(image: &RgbImage, kind: Enhancement) -> RgbImage {
    let (width, height) = image.dimensions();
    log::debug!("Applying {kind} to {width}x{height} image");

    match kind {
        Enhancement::BilateralFiltering => transform::bilateral_filtering(image),
        Enhancement::UnsharpMasking => transform::unsharp_masking(image),
        Enhancement::SaturationEnhancement => transform::saturation_enhancement(image),
        Enhancement::GammaCorrection => transform::gamma_correction(image),
        Enhancement::EdgeEnhancement => transform::edge_enhancement(image),
    }
}

fn validate(image: &DynamicImage) -> Result<&RgbImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::InvalidImage(format!(
            "empty image ({}x{})",
            image.width(),
            image.height()
        )));
    }

    match image {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        other => Err(Error::InvalidImage(format!(
            "expected 3-channel 8-bit image, got {}",
            describe(other.color())
        ))),
    }
}

fn describe(color: ColorType) -> String {
    format!(
        "{} channel(s) at {} bits",
        color.channel_count(),
        color.bits_per_pixel() / color.channel_count() as u16
    )
}
