//! Image decoding

use imageproc::image::{load_from_memory, DynamicImage};

use crate::error::{Error, Result};

/// Decode any format the `image` crate understands from memory
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    load_from_memory(data).map_err(Error::Decode)
}
