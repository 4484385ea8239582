//! Where images come from and where enhanced PNGs go

use imageproc::image::DynamicImage;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Upload formats accepted by [`FileSource`]
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Supplies one decoded image, normalized to 8-bit RGB.
pub trait ImageSource {
    /// Display name of the upload, used in logs
    fn name(&self) -> &str;

    fn load(&self) -> Result<DynamicImage>;
}

/// Receives an encoded file under the name it should be offered as.
pub trait ImageSink {
    /// Returns where the file ended up.
    fn store(&mut self, file_name: &str, data: &[u8]) -> Result<PathBuf>;
}

/// Drop alpha and expand grayscale so the enhancer always sees RGB8.
fn normalize(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) => img,
        other => {
            log::debug!("Converting {:?} upload to RGB8", other.color());
            DynamicImage::ImageRgb8(other.into_rgb8())
        }
    }
}

/// A JPEG or PNG file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::InvalidImage(format!(
                "unsupported file type `{}`, expected one of {}",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<DynamicImage> {
        let data = fs::read(&self.path)?;
        log::debug!("Read {} bytes from {}", data.len(), self.path.display());
        crate::image::decode(&data).map(normalize)
    }
}

/// An upload already held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

impl ImageSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<DynamicImage> {
        crate::image::decode(&self.data).map(normalize)
    }
}

/// Writes into a directory. Each file goes through a temporary file in the
/// same directory and is renamed into place, so a failed write never leaves
/// a truncated output behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageSink for DirectorySink {
    fn store(&mut self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        let output_path = self.dir.join(file_name);

        let mut temp = tempfile::Builder::new()
            .prefix(".imgenhance-")
            .suffix(".png")
            .tempfile_in(&self.dir)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(&output_path).map_err(|e| Error::Io(e.error))?;

        log::info!("Wrote {}", output_path.display());
        Ok(output_path)
    }
}

/// Keeps stored files in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl ImageSink for MemorySink {
    fn store(&mut self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        self.files.push((file_name.to_string(), data.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
