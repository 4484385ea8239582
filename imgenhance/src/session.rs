//! One upload in, one enhanced PNG (and optionally a comparison) out

use imageproc::image::{DynamicImage, GenericImageView};

use std::path::PathBuf;

use crate::config::EnhanceConfig;
use crate::error::Result;
use crate::image::{encode_png, enhance, side_by_side};
use crate::io::{ImageSink, ImageSource};

/// What a [`run`] stored
#[derive(Debug, Clone)]
pub struct Processed {
    pub file_name: String,
    pub path: PathBuf,
    pub dimensions: (u32, u32),
    pub comparison: Option<PathBuf>,
}

/// Load, enhance, encode and store.
///
/// The sink is only called once the transform and every encode have
/// succeeded. Storing is not transactional: if the comparison cannot be
/// stored, the enhanced image already handed to the sink stays there.
pub fn run(
    source: &dyn ImageSource,
    sink: &mut dyn ImageSink,
    config: &EnhanceConfig,
) -> Result<Processed> {
    let kind = config.enhancement;
    log::info!("Enhancing `{}` with {kind}", source.name());

    let original = source.load()?;
    let enhanced = enhance(&original, kind)?;
    let dimensions = enhanced.dimensions();

    let data = encode_png(&enhanced, config.png_compression)?;
    let comparison = if config.side_by_side {
        let canvas = side_by_side(&original.to_rgb8(), &enhanced.to_rgb8());
        Some(encode_png(
            &DynamicImage::ImageRgb8(canvas),
            config.png_compression,
        )?)
    } else {
        None
    };

    let file_name = kind.output_file_name();
    let path = sink.store(&file_name, &data)?;
    let comparison = match comparison {
        Some(bytes) => Some(sink.store(&kind.comparison_file_name(), &bytes)?),
        None => None,
    };

    log::debug!("Stored {file_name} ({} bytes)", data.len());

    Ok(Processed {
        file_name,
        path,
        dimensions,
        comparison,
    })
}
