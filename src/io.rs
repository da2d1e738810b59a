//! Image decode/encode and the editor error taxonomy.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError, RgbaImage};

/// Quality used for JPEG/WEBP output when the caller doesn't specify one.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Error type for every editor-facing operation.
#[derive(Debug)]
pub enum EditorError {
    /// The source file could not be decoded as an image.
    Decode(String),
    /// Bad caller input: zero block size, zero-dimension image,
    /// unparseable numeric text from the UI or CLI.
    InvalidArgument(String),
    /// The working buffer could not be encoded to the target format.
    Encode(String),
    /// Filesystem failure while reading or writing.
    Io(std::io::Error),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Decode(e) => write!(f, "decode error: {}", e),
            EditorError::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            EditorError::Encode(e) => write!(f, "encode error: {}", e),
            EditorError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<std::io::Error> for EditorError {
    fn from(e: std::io::Error) -> Self {
        EditorError::Io(e)
    }
}

/// Decode any raster format the `image` crate supports (PNG, JPEG, WEBP,
/// BMP, TGA, TIFF, …) into an RGBA buffer.
///
/// A missing or unreadable file surfaces as [`EditorError::Io`]; a file that
/// exists but isn't a decodable image surfaces as [`EditorError::Decode`].
pub fn decode_image(path: &Path) -> Result<RgbaImage, EditorError> {
    match image::open(path) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(ImageError::IoError(e)) => Err(EditorError::Io(e)),
        Err(e) => Err(EditorError::Decode(e.to_string())),
    }
}

/// Encode and write an image to `path` in the format implied by its
/// extension. JPEG goes through an explicit encoder so `quality` applies;
/// JPEG has no alpha channel, so the buffer is flattened to RGB first.
pub fn encode_and_write(
    image: &RgbaImage,
    path: &Path,
    quality: u8,
) -> Result<(), EditorError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            encoder
                .encode(
                    rgb_image.as_raw(),
                    rgb_image.width(),
                    rgb_image.height(),
                    image::ColorType::Rgb8,
                )
                .map_err(map_encode_error)?;
        }
        _ => {
            // The `image` crate picks the encoder from the extension and
            // reports unknown extensions as an unsupported-format error.
            image.save(path).map_err(map_encode_error)?;
        }
    }

    Ok(())
}

fn map_encode_error(e: ImageError) -> EditorError {
    match e {
        ImageError::IoError(io) => EditorError::Io(io),
        other => EditorError::Encode(other.to_string()),
    }
}
