// ## 📂 File: `src/integrity/validator.rs`

//! Payload validator seam and the image-backed implementation.
//!
//! Contract: given bytes (or a path), fully decode them and return canonical
//! structural metadata, or fail. A container-header sniff is not enough; the
//! image validator decodes twice on independent handles and requires both
//! passes to agree.

use std::io::{self, BufRead, Cursor, Seek};
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{GenericImageView, ImageFormat};

use crate::integrity::digest::sha256_bytes;
use crate::integrity::types::{ImageInfo, ValidationError};

pub trait PayloadValidator: Send + Sync {
    fn validate_path(&self, path: &Path) -> Result<ImageInfo, ValidationError>;

    fn validate_bytes(&self, bytes: &[u8]) -> Result<ImageInfo, ValidationError>;

    /// Canonical content fingerprint, if this validator has one.
    fn fingerprint_path(&self, _path: &Path) -> Result<Option<String>, ValidationError> {
        Ok(None)
    }
}

/// Validator backed by the `image` crate decoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageValidator;

impl PayloadValidator for ImageValidator {
    fn validate_path(&self, path: &Path) -> Result<ImageInfo, ValidationError> {
        let name = display_name(path);
        two_pass_decode(&name, || ImageReader::open(path))
    }

    fn validate_bytes(&self, bytes: &[u8]) -> Result<ImageInfo, ValidationError> {
        two_pass_decode("<memory>", || Ok(ImageReader::new(Cursor::new(bytes))))
    }

    fn fingerprint_path(&self, path: &Path) -> Result<Option<String>, ValidationError> {
        pixel_fingerprint(path).map(Some)
    }
}

/// SHA-256 over the decoded RGB8 pixel buffer.
///
/// Equal fingerprints mean equal pixels even if the container bytes differ.
pub fn pixel_fingerprint(path: &Path) -> Result<String, ValidationError> {
    let img = image::open(path).map_err(|e| ValidationError::Undecodable {
        name: display_name(path),
        reason: e.to_string(),
    })?;
    Ok(sha256_bytes(img.to_rgb8().as_raw()))
}

/// Upper-case tag for a decoder format (`Png` -> `"PNG"`).
pub fn format_tag(format: ImageFormat) -> String {
    format!("{:?}", format).to_ascii_uppercase()
}

fn two_pass_decode<R, F>(name: &str, open: F) -> Result<ImageInfo, ValidationError>
where
    R: BufRead + Seek,
    F: Fn() -> io::Result<ImageReader<R>>,
{
    let undecodable = |e: image::ImageError| ValidationError::Undecodable {
        name: name.to_string(),
        reason: e.to_string(),
    };

    // Pass 1: full decode.
    let first = open()?.with_guessed_format()?;
    let format = first
        .format()
        .ok_or_else(|| ValidationError::UnknownFormat { name: name.to_string() })?;
    let (width, height) = first.decode().map_err(undecodable)?.dimensions();

    // Pass 2: fresh handle, decode again.
    let second = open()?.with_guessed_format()?;
    let second_format = second.format();
    let img = second.decode().map_err(undecodable)?;

    if second_format != Some(format) || img.dimensions() != (width, height) {
        return Err(ValidationError::Inconsistent {
            reason: format!(
                "first pass {:?} {}x{}, second pass {:?} {}x{}",
                format,
                width,
                height,
                second_format,
                img.width(),
                img.height()
            ),
        });
    }

    Ok(ImageInfo {
        format: format_tag(format),
        width,
        height,
        mode: format!("{:?}", img.color()),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
