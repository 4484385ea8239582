//! PNG encoding

use imageproc::image::codecs::png::{CompressionType, FilterType, PngEncoder};
use imageproc::image::{ColorType, DynamicImage, GenericImageView, ImageEncoder};

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// Compress an image to PNG format with the specified compression level
pub fn compress_to_png<W>(
    img: &DynamicImage,
    writer: &mut W,
    compression: PngCompression,
) -> Result<()>
where
    W: std::io::Write,
{
    let compression_type = match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    };

    let is_grayscale = img.color() == ColorType::L8 || img.color() == ColorType::La8;

    let encoder = PngEncoder::new_with_quality(
        writer,
        compression_type,
        if is_grayscale {
            FilterType::NoFilter
        } else {
            FilterType::Adaptive
        },
    );

    let (width, height) = img.dimensions();
    encoder
        .write_image(img.as_bytes(), width, height, img.color().into())
        .map_err(Error::Encode)
}

/// Encode to an in-memory PNG blob
pub fn encode_png(img: &DynamicImage, compression: PngCompression) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut buffer = Vec::with_capacity((width * height) as usize);
    compress_to_png(img, &mut buffer, compression)?;

    log::trace!("Encoded {width}x{height} PNG, {} bytes", buffer.len());
    Ok(buffer)
}
