//! integrity/pipeline.rs
//! `compute` for the sending side, `verify` for the receiving side.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::integrity::digest::{sha256_file, verify_digest};
use crate::integrity::types::{
    DeclaredIntegrity, IntegrityError, IntegrityOptions, IntegrityResult, ValidationError,
};
use crate::integrity::validator::{ImageValidator, PayloadValidator};
use crate::telemetry::{Stage, TelemetryTimer};
use crate::types::TransferError;

#[derive(Clone)]
pub struct IntegrityPipeline {
    validator: Arc<dyn PayloadValidator>,
    options: IntegrityOptions,
}

impl Default for IntegrityPipeline {
    fn default() -> Self {
        Self::new(Arc::new(ImageValidator), IntegrityOptions::default())
    }
}

impl IntegrityPipeline {
    pub fn new(validator: Arc<dyn PayloadValidator>, options: IntegrityOptions) -> Self {
        Self { validator, options }
    }

    pub fn options(&self) -> IntegrityOptions {
        self.options
    }

    pub fn validator(&self) -> &dyn PayloadValidator {
        self.validator.as_ref()
    }

    /// Digest and (optionally) structure of a local file.
    pub fn compute(&self, path: &Path, timer: &mut TelemetryTimer) -> Result<IntegrityResult, TransferError> {
        let size_bytes = fs::metadata(path)?.len();

        let info = if self.options.validate {
            Some(timer.time(Stage::Validate, || self.validator.validate_path(path))?)
        } else {
            None
        };

        let sha256 = timer.time(Stage::Hash, || sha256_file(path))?;

        let pixel_fp = if self.options.fingerprint {
            timer.time(Stage::Fingerprint, || self.validator.fingerprint_path(path))?
        } else {
            None
        };

        debug!("computed integrity for {}: {}B sha256={}", path.display(), size_bytes, sha256);
        Ok(IntegrityResult { sha256, size_bytes, info, pixel_fp })
    }

    /// Check a received file against what the sender declared.
    ///
    /// Order: size, digest, structure, dimensions, fingerprint. Digest failures
    /// are `IntegrityError`; everything after the digest passed is a
    /// `ValidationError`.
    pub fn verify(
        &self,
        path: &Path,
        declared: &DeclaredIntegrity,
        timer: &mut TelemetryTimer,
    ) -> Result<IntegrityResult, TransferError> {
        let size_bytes = fs::metadata(path)?.len();
        if size_bytes != declared.size_bytes {
            return Err(IntegrityError::SizeMismatch { expected: declared.size_bytes, actual: size_bytes }.into());
        }

        let sha256 = timer.time(Stage::Hash, || sha256_file(path))?;
        verify_digest(&declared.sha256, &sha256)?;

        let info = if self.options.validate {
            let info = timer.time(Stage::Validate, || self.validator.validate_path(path))?;

            if let (Some(w), Some(h)) = (declared.width, declared.height) {
                if (info.width, info.height) != (w, h) {
                    return Err(ValidationError::DimensionsMismatch {
                        declared_width: w,
                        declared_height: h,
                        actual_width: info.width,
                        actual_height: info.height,
                    }
                    .into());
                }
            }
            Some(info)
        } else {
            None
        };

        let want_fp = self.options.fingerprint || self.options.require_fingerprint_match;
        let pixel_fp = if want_fp {
            timer.time(Stage::Fingerprint, || self.validator.fingerprint_path(path))?
        } else {
            None
        };

        if let (Some(expected), Some(actual)) = (&declared.pixel_fp, &pixel_fp) {
            if !expected.eq_ignore_ascii_case(actual) {
                if self.options.require_fingerprint_match {
                    return Err(ValidationError::FingerprintMismatch {
                        expected: expected.clone(),
                        actual: actual.clone(),
                    }
                    .into());
                }
                warn!("pixel fingerprint differs from declared (advisory): {} vs {}", expected, actual);
            }
        }

        Ok(IntegrityResult { sha256, size_bytes, info, pixel_fp })
    }
}
