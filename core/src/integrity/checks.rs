//! integrity/checks.rs
//! Named pass/fail checklists a front end can show before sending and after
//! receiving. These never abort: every check runs and reports.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::integrity::digest::{digests_match, sha256_file};
use crate::integrity::validator::PayloadValidator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub details: String,
}

impl CheckResult {
    fn new(name: &str, ok: bool, details: impl Into<String>) -> Self {
        Self { name: name.to_string(), ok, details: details.into() }
    }
}

/// Metadata collected by the preflight and compared by the postflight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedMeta {
    pub size_bytes: Option<u64>,
    pub sha256: Option<String>,
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.ok)
}

/// Sender side: exists, readable, digest, decodes.
pub fn sender_preflight(path: &Path, validator: &dyn PayloadValidator) -> (Vec<CheckResult>, ExpectedMeta) {
    let mut results = Vec::new();
    let mut meta = ExpectedMeta::default();

    let exists = path.exists();
    results.push(CheckResult::new("File exists", exists, path.display().to_string()));
    if !exists {
        return (results, meta);
    }

    match fs::metadata(path) {
        Ok(m) => {
            results.push(CheckResult::new("Readable + size", true, format!("{} bytes", m.len())));
            meta.size_bytes = Some(m.len());
        }
        Err(e) => {
            results.push(CheckResult::new("Readable + size", false, e.to_string()));
            return (results, meta);
        }
    }

    match sha256_file(path) {
        Ok(d) => {
            results.push(CheckResult::new("SHA-256 computed", true, d.clone()));
            meta.sha256 = Some(d);
        }
        Err(e) => results.push(CheckResult::new("SHA-256 computed", false, e.to_string())),
    }

    match validator.validate_path(path) {
        Ok(info) => {
            results.push(CheckResult::new(
                "Image decode",
                true,
                format!("{} {}x{} mode={}", info.format, info.width, info.height, info.mode),
            ));
            meta.format = Some(info.format);
            meta.width = Some(info.width);
            meta.height = Some(info.height);
        }
        Err(e) => results.push(CheckResult::new("Image decode", false, e.to_string())),
    }

    (results, meta)
}

/// Receiver side: saved, size, digest, decodes, and matches whatever of
/// `expected` is known.
pub fn receiver_postflight(
    path: &Path,
    expected: &ExpectedMeta,
    validator: &dyn PayloadValidator,
) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let exists = path.exists();
    results.push(CheckResult::new("File saved", exists, path.display().to_string()));
    if !exists {
        return results;
    }

    match fs::metadata(path) {
        Ok(m) => {
            let got = m.len();
            results.push(CheckResult::new("Size computed", true, format!("{} bytes", got)));
            if let Some(exp) = expected.size_bytes {
                results.push(CheckResult::new("Size match", got == exp, match_details(exp, got)));
            }
        }
        Err(e) => results.push(CheckResult::new("Size computed", false, e.to_string())),
    }

    match sha256_file(path) {
        Ok(got) => {
            results.push(CheckResult::new("SHA-256 computed", true, got.clone()));
            if let Some(exp) = &expected.sha256 {
                let ok = digests_match(exp, &got);
                results.push(CheckResult::new("SHA-256 match", ok, match_details(exp, &got)));
            }
        }
        Err(e) => results.push(CheckResult::new("SHA-256 computed", false, e.to_string())),
    }

    match validator.validate_path(path) {
        Ok(info) => {
            results.push(CheckResult::new(
                "Image decode",
                true,
                format!("{} {}x{} mode={}", info.format, info.width, info.height, info.mode),
            ));
            if let Some(fmt) = &expected.format {
                results.push(CheckResult::new(
                    "Format match",
                    fmt.eq_ignore_ascii_case(&info.format),
                    match_details(fmt, &info.format),
                ));
            }
            if let (Some(w), Some(h)) = (expected.width, expected.height) {
                let ok = (w, h) == (info.width, info.height);
                results.push(CheckResult::new(
                    "Resolution match",
                    ok,
                    match_details(format!("{}x{}", w, h), format!("{}x{}", info.width, info.height)),
                ));
            }
        }
        Err(e) => results.push(CheckResult::new("Image decode", false, e.to_string())),
    }

    results
}

fn match_details<A: PartialEq<B> + std::fmt::Display, B: std::fmt::Display>(expected: A, got: B) -> String {
    if expected == got {
        "match".to_string()
    } else {
        format!("expected={}, got={}", expected, got)
    }
}
