#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use imgtx_core::{
        crypto::{
            aad_for_received, build_aad, decrypt, derive_key_32, encrypt, new_session_id, AeadImpl, CryptoError,
            KdfParams, TAG_LEN,
        },
        headers::{AssociatedData, CipherSuite, SecureHeader},
    };

    // Cheapest accepted work factor; keeps the suite fast.
    fn fast() -> KdfParams {
        KdfParams { log_n: 10, r: 8, p: 1 }
    }

    fn ad() -> AssociatedData {
        AssociatedData {
            session_id: "5e".repeat(16),
            timestamp: 1_700_000_123,
            filename: "cat.png".into(),
        }
    }

// ## 1️⃣ Key derivation

    #[test]
    fn derivation_is_deterministic_and_salt_sensitive() {
        let k1 = derive_key_32(b"pw", &[1; 16], &fast()).unwrap();
        let k2 = derive_key_32(b"pw", &[1; 16], &fast()).unwrap();
        let k3 = derive_key_32(b"pw", &[2; 16], &fast()).unwrap();
        let k4 = derive_key_32(b"pw2", &[1; 16], &fast()).unwrap();
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert_ne!(k1, k4);
    }

    #[test]
    fn weak_work_factor_refused() {
        let weak = KdfParams { log_n: 4, r: 8, p: 1 };
        let err = derive_key_32(b"pw", &[1; 16], &weak).unwrap_err();
        assert!(matches!(err, CryptoError::WeakKdfParams { log_n: 4, min: 10 }));
    }

    #[test]
    fn zero_salt_refused() {
        let err = derive_key_32(b"pw", &[0; 16], &fast()).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidSalt));
    }

    #[test]
    fn default_params_are_interactive_scrypt() {
        assert_eq!(KdfParams::default(), KdfParams { log_n: 14, r: 8, p: 1 });
    }

// ## 2️⃣ Seal / open

    #[test]
    fn round_trip_both_suites() {
        let aad = build_aad(&ad()).unwrap();
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            let sealed = encrypt("secret", b"pixels", &aad, suite, &fast()).unwrap();
            assert_eq!(sealed.ciphertext.len(), b"pixels".len() + TAG_LEN);

            let pt = decrypt("secret", &sealed.salt, &sealed.nonce, &sealed.ciphertext, &aad, suite, &fast()).unwrap();
            assert_eq!(pt, b"pixels");
        }
    }

    #[test]
    fn fresh_salt_and_nonce_per_message() {
        let a = encrypt("secret", b"same", b"", CipherSuite::Aes256Gcm, &fast()).unwrap();
        let b = encrypt("secret", b"same", b"", CipherSuite::Aes256Gcm, &fast()).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn wrong_password_fails_closed() {
        let sealed = encrypt("right", b"data", b"ad", CipherSuite::Aes256Gcm, &fast()).unwrap();
        let err = decrypt("wrong", &sealed.salt, &sealed.nonce, &sealed.ciphertext, b"ad", CipherSuite::Aes256Gcm, &fast())
            .unwrap_err();
        assert!(matches!(err, CryptoError::Authentication));
    }

    #[test]
    fn altered_associated_data_fails_closed() {
        let sealed = encrypt("pw", b"data", b"ad-1", CipherSuite::Chacha20Poly1305, &fast()).unwrap();
        let err = decrypt("pw", &sealed.salt, &sealed.nonce, &sealed.ciphertext, b"ad-2", CipherSuite::Chacha20Poly1305, &fast())
            .unwrap_err();
        assert!(matches!(err, CryptoError::Authentication));
    }

    #[test]
    fn wrong_suite_fails_closed() {
        let sealed = encrypt("pw", b"data", b"", CipherSuite::Aes256Gcm, &fast()).unwrap();
        let err = decrypt("pw", &sealed.salt, &sealed.nonce, &sealed.ciphertext, b"", CipherSuite::Chacha20Poly1305, &fast())
            .unwrap_err();
        assert!(matches!(err, CryptoError::Authentication));
    }

    #[test]
    fn short_ciphertext_is_authentication_failure() {
        let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &[7u8; 32]).unwrap();
        let err = aead.open(&[0u8; 12], b"", &[0u8; TAG_LEN - 1]).unwrap_err();
        assert!(matches!(err, CryptoError::Authentication));
    }

    #[test]
    fn bad_key_and_nonce_lengths() {
        assert!(matches!(
            AeadImpl::new(CipherSuite::Aes256Gcm, &[0u8; 16]).unwrap_err(),
            CryptoError::InvalidKeyLen { expected: 32, actual: 16 }
        ));
        let aead = AeadImpl::new(CipherSuite::Chacha20Poly1305, &[0u8; 32]).unwrap();
        assert!(matches!(
            aead.seal(&[0u8; 8], b"", b"x").unwrap_err(),
            CryptoError::InvalidNonceLen { expected: 12, actual: 8 }
        ));
    }

// ## 3️⃣ Associated data

    #[test]
    fn aad_is_canonical_compact_json() {
        let bytes = build_aad(&ad()).unwrap();
        let expected = format!(
            r#"{{"session_id":"{}","timestamp":1700000123,"filename":"cat.png"}}"#,
            "5e".repeat(16)
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    fn received_header(echo: AssociatedData) -> SecureHeader {
        let top = ad();
        SecureHeader {
            protocol_version: 1,
            mode: CipherSuite::Aes256Gcm.mode_label().into(),
            session_id: top.session_id,
            timestamp: top.timestamp,
            filename: top.filename,
            salt: "01".repeat(16),
            nonce: "02".repeat(12),
            associated_data: echo,
            cipher_len: 32,
        }
    }

    #[test]
    fn received_aad_rebuilt_from_parsed_fields() {
        let h = received_header(ad());
        assert_eq!(aad_for_received(&h).unwrap(), build_aad(&ad()).unwrap());
    }

    #[test]
    fn disagreeing_echo_is_authentication_failure() {
        let mut echo = ad();
        echo.timestamp += 1;
        let err = aad_for_received(&received_header(echo)).unwrap_err();
        assert!(matches!(err, CryptoError::Authentication));
    }

    #[test]
    fn session_ids_are_128_bit_hex_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert_eq!(a.len(), 32);
        assert!(a.bytes().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_aad_changes_with_any_field(ts in any::<i64>(), name in "[a-z]{1,12}\\.png") {
            let base = ad();
            let other = AssociatedData { session_id: base.session_id.clone(), timestamp: ts, filename: name };
            let same = other == base;
            prop_assert_eq!(build_aad(&other).unwrap() == build_aad(&base).unwrap(), same);
        }

        #[test]
        fn prop_any_single_bit_flip_is_rejected(byte in 0usize..22, bit in 0u8..8) {
            let sealed = encrypt("pw", b"six bytes", b"", CipherSuite::Aes256Gcm, &fast()).unwrap();
            let mut ct = sealed.ciphertext.clone();
            let idx = byte % ct.len();
            ct[idx] ^= 1 << bit;
            let res = decrypt("pw", &sealed.salt, &sealed.nonce, &ct, b"", CipherSuite::Aes256Gcm, &fast());
            prop_assert!(matches!(res, Err(CryptoError::Authentication)));
        }
    }
}
