// Header encode/decode contract:

// * exact protocol version match, checked before anything else
// * compact JSON that never contains the plain-mode delimiter
// * malformed hex, lengths and modes rejected at decode time

#[cfg(test)]
mod tests {

use imgtx_core::{
    constants::{DELIMITER, HEADER_MAX_BYTES, MAX_SECURE_PAYLOAD, PROTOCOL_VERSION},
    headers::{
        decode_secure_header, decode_transfer_header, encode_secure_header, encode_transfer_header,
        AssociatedData, CipherSuite, HeaderError, SecureHeader, TransferHeader,
    },
};

    fn transfer_header() -> TransferHeader {
        TransferHeader {
            protocol_version: PROTOCOL_VERSION,
            filename: "cat.png".into(),
            content_type: "image/png".into(),
            size_bytes: 1234,
            sha256: "ab".repeat(32),
            width: Some(8),
            height: Some(6),
            pixel_fp: None,
        }
    }

    fn secure_header() -> SecureHeader {
        let session_id = "33".repeat(16);
        SecureHeader {
            protocol_version: PROTOCOL_VERSION,
            mode: CipherSuite::Aes256Gcm.mode_label().into(),
            session_id: session_id.clone(),
            timestamp: 1_700_000_000,
            filename: "cat.png".into(),
            salt: "11".repeat(16),
            nonce: "22".repeat(12),
            associated_data: AssociatedData {
                session_id,
                timestamp: 1_700_000_000,
                filename: "cat.png".into(),
            },
            cipher_len: 64,
        }
    }

// ## 1️⃣ Plain header

    #[test]
    fn transfer_header_decodes_what_it_encodes() {
        let h = transfer_header();
        let buf = encode_transfer_header(&h).unwrap();
        assert_eq!(decode_transfer_header(&buf).unwrap(), h);
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let mut h = transfer_header();
        h.width = None;
        h.height = None;
        let text = String::from_utf8(encode_transfer_header(&h).unwrap()).unwrap();
        assert!(!text.contains("width"));
        assert!(!text.contains("pixel_fp"));

        let back = decode_transfer_header(text.as_bytes()).unwrap();
        assert_eq!(back.width, None);
    }

    #[test]
    fn encoded_header_never_contains_delimiter() {
        let mut h = transfer_header();
        h.filename = "evil\r\n\r\nname.png".into();
        let buf = encode_transfer_header(&h).unwrap();
        assert!(!buf.windows(DELIMITER.len()).any(|w| w == DELIMITER));
        assert!(!buf.contains(&b'\n'));

        let back = decode_transfer_header(&buf).unwrap();
        assert_eq!(back.filename, h.filename);
    }

    #[test]
    fn non_ascii_filename_survives() {
        let mut h = transfer_header();
        h.filename = "фото-猫.png".into();
        let back = decode_transfer_header(&encode_transfer_header(&h).unwrap()).unwrap();
        assert_eq!(back.filename, "фото-猫.png");
    }

    #[test]
    fn bad_digest_rejected() {
        let mut h = transfer_header();
        h.sha256 = "xyz".into();
        assert!(matches!(
            encode_transfer_header(&h).unwrap_err(),
            HeaderError::InvalidField { field: "sha256", .. }
        ));
    }

    #[test]
    fn width_without_height_rejected() {
        let mut h = transfer_header();
        h.height = None;
        assert!(matches!(h.validate().unwrap_err(), HeaderError::InvalidField { .. }));
    }

    #[test]
    fn oversized_header_rejected() {
        let mut h = transfer_header();
        h.filename = "a".repeat(HEADER_MAX_BYTES + 1);
        assert!(matches!(encode_transfer_header(&h).unwrap_err(), HeaderError::TooLarge { .. }));
    }

// ## 2️⃣ Version and shape

    #[test]
    fn other_version_rejected_before_shape() {
        // Missing every other field: the version check still wins.
        let err = decode_transfer_header(br#"{"protocol_version":2}"#).unwrap_err();
        assert!(matches!(err, HeaderError::UnsupportedVersion { have: 2, need: PROTOCOL_VERSION }));
    }

    #[test]
    fn missing_version_rejected() {
        let err = decode_transfer_header(br#"{"filename":"a.png"}"#).unwrap_err();
        assert!(matches!(err, HeaderError::InvalidField { field: "protocol_version", .. }));
    }

    #[test]
    fn non_object_rejected() {
        assert!(matches!(decode_transfer_header(b"[1,2,3]").unwrap_err(), HeaderError::Json(_)));
        assert!(matches!(decode_transfer_header(b"not json").unwrap_err(), HeaderError::Json(_)));
    }

    #[test]
    fn missing_required_field_rejected() {
        let err = decode_transfer_header(br#"{"protocol_version":1,"filename":"a.png"}"#).unwrap_err();
        assert!(matches!(err, HeaderError::Json(_)));
    }

// ## 3️⃣ Secure header

    #[test]
    fn secure_header_decodes_what_it_encodes() {
        let h = secure_header();
        let back = decode_secure_header(&encode_secure_header(&h).unwrap()).unwrap();
        assert_eq!(back, h);
        assert_eq!(back.cipher_suite().unwrap(), CipherSuite::Aes256Gcm);
        assert_eq!(back.salt_bytes().unwrap(), [0x11; 16]);
        assert_eq!(back.nonce_bytes().unwrap(), [0x22; 12]);
    }

    #[test]
    fn unknown_mode_rejected() {
        let mut h = secure_header();
        h.mode = "rot13+none".into();
        assert!(matches!(h.validate().unwrap_err(), HeaderError::UnknownMode(m) if m == "rot13+none"));
    }

    #[test]
    fn cipher_len_below_tag_rejected() {
        let mut h = secure_header();
        h.cipher_len = 15;
        assert!(matches!(h.validate().unwrap_err(), HeaderError::InvalidField { field: "cipher_len", .. }));
    }

    #[test]
    fn cipher_len_above_payload_cap_rejected() {
        let mut h = secure_header();
        h.cipher_len = MAX_SECURE_PAYLOAD + 1;
        assert!(matches!(h.validate().unwrap_err(), HeaderError::InvalidField { field: "cipher_len", .. }));

        // Encode refuses it, so build the wire bytes directly.
        let raw = serde_json::to_vec(&h).unwrap();
        assert!(matches!(
            decode_secure_header(&raw).unwrap_err(),
            HeaderError::InvalidField { field: "cipher_len", .. }
        ));

        h.cipher_len = MAX_SECURE_PAYLOAD;
        h.validate().unwrap();
    }

    #[test]
    fn all_zero_salt_rejected() {
        let mut h = secure_header();
        h.salt = "00".repeat(16);
        assert!(matches!(h.validate().unwrap_err(), HeaderError::InvalidField { field: "salt", .. }));

        let raw = serde_json::to_vec(&h).unwrap();
        assert!(matches!(
            decode_secure_header(&raw).unwrap_err(),
            HeaderError::InvalidField { field: "salt", .. }
        ));
    }

    #[test]
    fn short_salt_rejected() {
        let mut h = secure_header();
        h.salt = "11".repeat(8);
        assert!(matches!(h.validate().unwrap_err(), HeaderError::InvalidField { field: "salt", .. }));
    }

    #[test]
    fn bad_session_id_rejected() {
        let mut h = secure_header();
        h.session_id = "not-hex".into();
        assert!(matches!(h.validate().unwrap_err(), HeaderError::InvalidField { field: "session_id", .. }));
    }

    #[test]
    fn rebuilt_associated_data_uses_top_level_fields() {
        let mut h = secure_header();
        h.associated_data.filename = "other.png".into();
        let rebuilt = h.rebuilt_associated_data();
        assert_eq!(rebuilt.filename, "cat.png");
        assert_ne!(rebuilt, h.associated_data);
    }

    #[test]
    fn mode_labels_round_trip() {
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            assert_eq!(CipherSuite::from_mode_label(suite.mode_label()).unwrap(), suite);
        }
        assert_eq!(CipherSuite::default(), CipherSuite::Aes256Gcm);
    }
}
