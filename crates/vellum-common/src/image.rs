//! Raster image recoding.
//!
//! The converter never writes pixels itself. Bitmap layers are handed to an
//! [`ImageRecoder`], which turns raw bytes plus a declared type into a
//! locator string suitable for an `href` (a `data:` URI or a file name).
//!
//! Two recoders are provided:
//!
//! 1. [`DataUriRecoder`] embeds the payload as a base64 `data:` URI.
//! 2. [`DirectoryRecoder`] writes the payload next to the output document.
//!
//! Both pass PNG and JPEG payloads through unchanged (after a decode probe)
//! and re-encode anything else the `image` crate can read as PNG.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use base64::Engine;
use image::ImageFormat;
use thiserror::Error;

/// Failure to recode an image payload.
#[derive(Debug, Error)]
pub enum RecodeError {
    /// Neither the declared type nor the payload identify a known format.
    #[error("unrecognized image type '{0}'")]
    UnknownFormat(String),
    /// The payload could not be decoded or re-encoded.
    #[error("could not recode image ({0})")]
    Codec(#[from] image::ImageError),
    /// Writing the recoded payload failed.
    #[error("could not write image ({0})")]
    Io(#[from] std::io::Error),
}

/// Image recoding collaborator.
pub trait ImageRecoder {
    /// Recode `bytes` (declared as `declared_type`) and return a locator for
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns a [`RecodeError`] if the payload cannot be decoded, encoded, or
    /// stored.
    fn recode(&mut self, bytes: &[u8], declared_type: &str) -> Result<String, RecodeError>;
}

/// Map a declared type (UTI, MIME type, or file extension) to an image format.
#[must_use]
pub fn format_for_declared_type(declared_type: &str) -> Option<ImageFormat> {
    let lower = declared_type.to_ascii_lowercase();
    match lower.as_str() {
        "public.png" => Some(ImageFormat::Png),
        "public.jpeg" | "public.jpg" => Some(ImageFormat::Jpeg),
        "com.compuserve.gif" => Some(ImageFormat::Gif),
        "public.tiff" => Some(ImageFormat::Tiff),
        "com.microsoft.bmp" => Some(ImageFormat::Bmp),
        _ if lower.contains('/') => ImageFormat::from_mime_type(&lower),
        _ => ImageFormat::from_extension(&lower),
    }
}

/// A recoded payload ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Format of `bytes` (always PNG or JPEG).
    pub format: ImageFormat,
}

impl Payload {
    /// MIME type of the payload.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Preferred file extension of the payload.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        if self.format == ImageFormat::Jpeg {
            "jpg"
        } else {
            "png"
        }
    }
}

/// Decode `bytes` and produce a PNG or JPEG payload.
///
/// # Errors
///
/// Returns [`RecodeError::UnknownFormat`] if the format cannot be determined,
/// or [`RecodeError::Codec`] if decoding or PNG encoding fails.
pub fn recode_payload(bytes: &[u8], declared_type: &str) -> Result<Payload, RecodeError> {
    let format = match format_for_declared_type(declared_type) {
        Some(format) => format,
        None => image::guess_format(bytes)
            .map_err(|_| RecodeError::UnknownFormat(declared_type.to_string()))?,
    };

    let decoded = image::load_from_memory_with_format(bytes, format)?;
    if matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Ok(Payload {
            bytes: bytes.to_vec(),
            format,
        });
    }

    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, ImageFormat::Png)?;
    Ok(Payload {
        bytes: out.into_inner(),
        format: ImageFormat::Png,
    })
}

/// Embeds images as base64 `data:` URIs.
#[derive(Debug, Default)]
pub struct DataUriRecoder;

impl ImageRecoder for DataUriRecoder {
    fn recode(&mut self, bytes: &[u8], declared_type: &str) -> Result<String, RecodeError> {
        let payload = recode_payload(bytes, declared_type)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&payload.bytes);
        Ok(format!("data:{};base64,{encoded}", payload.mime_type()))
    }
}

/// Writes images into a directory as `image-N.png` / `image-N.jpg`.
///
/// Returned locators are file names relative to that directory.
#[derive(Debug)]
pub struct DirectoryRecoder {
    dir: PathBuf,
    written: usize,
}

impl DirectoryRecoder {
    /// Create a recoder writing into `dir` (created on first write).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    /// Number of files written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }
}

impl ImageRecoder for DirectoryRecoder {
    fn recode(&mut self, bytes: &[u8], declared_type: &str) -> Result<String, RecodeError> {
        let payload = recode_payload(bytes, declared_type)?;
        fs::create_dir_all(&self.dir)?;

        let name = format!("image-{}.{}", self.written + 1, payload.extension());
        fs::write(self.dir.join(&name), &payload.bytes)?;
        self.written += 1;
        Ok(name)
    }
}
