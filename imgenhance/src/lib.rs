pub mod config;
pub mod enhancement;
pub mod error;
pub mod image;
pub mod io;
pub mod session;

// Re-export commonly used types
pub use config::EnhanceConfig;
pub use enhancement::Enhancement;
pub use error::{Error, Result};
pub use image::{enhance, enhance_by_label, PngCompression};
pub use io::{DirectorySink, FileSource, ImageSink, ImageSource, MemorySink, MemorySource};
