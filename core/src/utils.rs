use crate::constants::DISPLAY_NAME_MAX_BYTES;

/// MIME type for a detected image format name (`"PNG"`, `"JPEG"`, ...).
pub fn content_type_from_format(format: &str) -> String {
    match format.to_ascii_uppercase().as_str() {
        "JPEG" | "JPG" => "image/jpeg".to_string(),
        "PNG" => "image/png".to_string(),
        other => format!("image/{}", other.to_ascii_lowercase()),
    }
}

/// Extensions longer than this are treated as part of the stem when truncating.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Reduce a peer-supplied filename to a bare display name.
///
/// The header `filename` is never interpreted as a path: any directory part
/// (either separator style) is dropped, and names that would resolve to the
/// directory itself fall back to `"image"`. Long names are cut to
/// `DISPLAY_NAME_MAX_BYTES` on a char boundary, keeping the extension, so the
/// staged and saved names built from them stay within filesystem limits.
pub fn display_basename(filename: &str) -> String {
    let last = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();

    match cleaned.as_str() {
        "" | "." | ".." => "image".to_string(),
        _ => truncate_keeping_extension(cleaned, DISPLAY_NAME_MAX_BYTES),
    }
}

fn truncate_keeping_extension(name: String, max: usize) -> String {
    if name.len() <= max {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(i) if i > 0 && name.len() - i <= MAX_KEPT_EXTENSION_BYTES => name.split_at(i),
        _ => (name.as_str(), ""),
    };

    let mut cut = (max - ext.len()).min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &stem[..cut], ext)
}

/// Lowercase hex of `n` random bytes from the OS RNG.
pub fn random_hex(n: usize) -> String {
    use rand::RngCore;

    let mut buf = vec![0u8; n];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(display_basename("../../etc/passwd"), "passwd");
        assert_eq!(display_basename("C:\\Users\\me\\cat.png"), "cat.png");
        assert_eq!(display_basename("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn basename_rejects_directory_names() {
        assert_eq!(display_basename(""), "image");
        assert_eq!(display_basename(".."), "image");
        assert_eq!(display_basename("dir/"), "image");
    }

    #[test]
    fn long_names_are_capped_keeping_extension() {
        let name = format!("{}.png", "n".repeat(236));
        let short = display_basename(&name);
        assert_eq!(short.len(), DISPLAY_NAME_MAX_BYTES);
        assert!(short.ends_with(".png"));
        assert!(short.starts_with("nnn"));

        let exact = format!("{}.jpg", "a".repeat(DISPLAY_NAME_MAX_BYTES - 4));
        assert_eq!(display_basename(&exact), exact);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Three-byte chars: 128 is not a multiple of 3.
        let name = format!("{}.png", "猫".repeat(100));
        let short = display_basename(&name);
        assert!(short.len() <= DISPLAY_NAME_MAX_BYTES);
        assert!(short.ends_with(".png"));
        assert!(short.trim_end_matches(".png").chars().all(|c| c == '猫'));
    }

    #[test]
    fn long_name_without_extension_is_cut() {
        let name = "x".repeat(300);
        assert_eq!(display_basename(&name), "x".repeat(DISPLAY_NAME_MAX_BYTES));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_from_format("JPEG"), "image/jpeg");
        assert_eq!(content_type_from_format("png"), "image/png");
        assert_eq!(content_type_from_format("WebP"), "image/webp");
    }
}
