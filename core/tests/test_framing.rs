// Framing over real-world byte streams:
// partial reads, delimiters split across reads, early close, hostile lengths.

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use proptest::prelude::*;

    use imgtx_core::{
        constants::{DELIMITER, HEADER_MAX_BYTES, PROTOCOL_VERSION},
        framing::{
            encode_delimited, frame_secure_message, read_ciphertext, read_delimited_header,
            read_exact_or_closed, read_length_prefixed_header, read_until_delimiter, recv_exact_into,
            FramingError,
        },
        headers::{AssociatedData, CipherSuite, SecureHeader, TransferHeader},
    };

    /// Yields at most `max` bytes per read.
    struct Trickle<R> {
        inner: R,
        max: usize,
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.max);
            self.inner.read(&mut buf[..n])
        }
    }

    fn trickle(bytes: Vec<u8>, max: usize) -> Trickle<Cursor<Vec<u8>>> {
        Trickle { inner: Cursor::new(bytes), max }
    }

    fn header_for(payload: &[u8]) -> TransferHeader {
        TransferHeader {
            protocol_version: PROTOCOL_VERSION,
            filename: "blob.bin".into(),
            content_type: "application/octet-stream".into(),
            size_bytes: payload.len() as u64,
            sha256: "0f".repeat(32),
            width: None,
            height: None,
            pixel_fp: None,
        }
    }

    fn wire(payload: &[u8]) -> Vec<u8> {
        let mut out = encode_delimited(&header_for(payload)).unwrap();
        out.extend_from_slice(payload);
        out
    }

    /// Header, then exactly `size_bytes` of payload (carried bytes first).
    fn receive_all<R: Read>(r: &mut R) -> (TransferHeader, Vec<u8>) {
        let (h, carried, _) = read_delimited_header(r).unwrap();
        let mut sink = Vec::new();
        let n = recv_exact_into(r, &mut sink, h.size_bytes, &carried).unwrap();
        assert_eq!(n, h.size_bytes);
        (h, sink)
    }

    fn secure_header(cipher_len: u64) -> SecureHeader {
        let session_id = "ab".repeat(16);
        SecureHeader {
            protocol_version: PROTOCOL_VERSION,
            mode: CipherSuite::Chacha20Poly1305.mode_label().into(),
            session_id: session_id.clone(),
            timestamp: 42,
            filename: "x.png".into(),
            salt: "01".repeat(16),
            nonce: "02".repeat(12),
            associated_data: AssociatedData { session_id, timestamp: 42, filename: "x.png".into() },
            cipher_len,
        }
    }

// ## 1️⃣ Delimiter framing

    #[test]
    fn bytes_past_delimiter_are_carried() {
        let payload = b"hello payload".to_vec();
        let (h, carried, wire_len) = read_delimited_header(&mut Cursor::new(wire(&payload))).unwrap();
        assert_eq!(h.size_bytes, payload.len() as u64);
        assert_eq!(&carried[..], &payload[..]);
        assert_eq!(wire_len, encode_delimited(&h).unwrap().len());
    }

    #[test]
    fn one_byte_reads_still_find_delimiter() {
        let payload = vec![7u8; 300];
        let (_, got) = receive_all(&mut trickle(wire(&payload), 1));
        assert_eq!(got, payload);
    }

    #[test]
    fn payload_containing_delimiter_is_not_confused() {
        let mut payload = b"before".to_vec();
        payload.extend_from_slice(DELIMITER);
        payload.extend_from_slice(b"after");
        let (_, got) = receive_all(&mut trickle(wire(&payload), 5));
        assert_eq!(got, payload);
    }

    #[test]
    fn eof_before_delimiter() {
        let err = read_until_delimiter(&mut Cursor::new(br#"{"protocol_version":1}"#.to_vec())).unwrap_err();
        assert!(matches!(err, FramingError::MissingDelimiter { received: 22 }));
    }

    #[test]
    fn empty_stream_has_no_delimiter() {
        let err = read_until_delimiter(&mut Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, FramingError::MissingDelimiter { received: 0 }));
    }

    #[test]
    fn endless_header_hits_ceiling() {
        let junk = vec![b'a'; HEADER_MAX_BYTES * 2];
        let err = read_until_delimiter(&mut Cursor::new(junk)).unwrap_err();
        assert!(matches!(err, FramingError::HeaderTooLarge { limit: HEADER_MAX_BYTES, .. }));
    }

    #[test]
    fn delimiter_after_ceiling_is_too_late() {
        let mut junk = vec![b'a'; HEADER_MAX_BYTES + 10];
        junk.extend_from_slice(DELIMITER);
        let err = read_until_delimiter(&mut trickle(junk, 4096)).unwrap_err();
        assert!(matches!(err, FramingError::HeaderTooLarge { .. }));
    }

    #[test]
    fn garbage_header_is_a_header_error() {
        let mut bytes = b"{not json".to_vec();
        bytes.extend_from_slice(DELIMITER);
        let err = read_delimited_header(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, FramingError::Header(_)));
    }

// ## 2️⃣ Exact-length receive

    #[test]
    fn short_stream_returns_short_count() {
        let mut sink = Vec::new();
        let n = recv_exact_into(&mut Cursor::new(vec![1u8; 10]), &mut sink, 25, &[9, 9]).unwrap();
        assert_eq!(n, 12);
        assert_eq!(&sink[..2], &[9, 9]);
    }

    #[test]
    fn carried_bytes_beyond_total_are_dropped() {
        let mut sink = Vec::new();
        let n = recv_exact_into(&mut Cursor::new(vec![1u8; 10]), &mut sink, 3, &[5, 6, 7, 8]).unwrap();
        assert_eq!(n, 3);
        assert_eq!(sink, vec![5, 6, 7]);
    }

    #[test]
    fn stops_at_total_and_leaves_the_rest() {
        let mut src = Cursor::new(vec![4u8; 100]);
        let mut sink = Vec::new();
        assert_eq!(recv_exact_into(&mut src, &mut sink, 40, &[]).unwrap(), 40);
        assert_eq!(src.position(), 40);
    }

    #[test]
    fn read_exact_or_closed_reports_shortfall() {
        let err = read_exact_or_closed(&mut Cursor::new(vec![0u8; 5]), 8).unwrap_err();
        assert!(matches!(err, FramingError::ConnectionClosed { expected: 8, received: 5 }));
    }

// ## 3️⃣ Length-prefix framing

    #[test]
    fn secure_message_splits_back_apart() {
        let ciphertext: Vec<u8> = (0..48u8).collect();
        let h = secure_header(ciphertext.len() as u64);
        let msg = frame_secure_message(&h, &ciphertext).unwrap();

        let declared = u32::from_be_bytes([msg[0], msg[1], msg[2], msg[3]]) as usize;
        assert_eq!(msg.len(), 4 + declared + ciphertext.len());

        let mut r = trickle(msg, 7);
        let (back, wire_len) = read_length_prefixed_header(&mut r).unwrap();
        assert_eq!(back, h);
        assert_eq!(wire_len, 4 + declared);
        assert_eq!(read_ciphertext(&mut r, &back).unwrap(), ciphertext);
    }

    #[test]
    fn ciphertext_length_must_match_header() {
        let err = frame_secure_message(&secure_header(32), &[0u8; 31]).unwrap_err();
        assert!(matches!(err, FramingError::LengthMismatch { expected: 32, actual: 31 }));
    }

    #[test]
    fn zero_length_prefix_rejected() {
        let err = read_length_prefixed_header(&mut Cursor::new(vec![0, 0, 0, 0])).unwrap_err();
        assert!(matches!(err, FramingError::InvalidLength(0)));
    }

    #[test]
    fn huge_length_prefix_rejected_without_reading() {
        let err = read_length_prefixed_header(&mut Cursor::new(vec![0xFF, 0xFF, 0xFF, 0xFF])).unwrap_err();
        assert!(matches!(err, FramingError::InvalidLength(u32::MAX)));
    }

    #[test]
    fn truncated_prefix_is_connection_closed() {
        let err = read_length_prefixed_header(&mut Cursor::new(vec![0, 0])).unwrap_err();
        assert!(matches!(err, FramingError::ConnectionClosed { expected: 4, received: 2 }));
    }

    #[test]
    fn truncated_ciphertext_is_connection_closed() {
        let ciphertext = vec![3u8; 40];
        let h = secure_header(40);
        let mut msg = frame_secure_message(&h, &ciphertext).unwrap();
        msg.truncate(msg.len() - 10);

        let mut r = Cursor::new(msg);
        let (back, _) = read_length_prefixed_header(&mut r).unwrap();
        let err = read_ciphertext(&mut r, &back).unwrap_err();
        assert!(matches!(err, FramingError::ConnectionClosed { expected: 40, received: 30 }));
    }

// ## 4️⃣ Properties

    proptest! {
        #[test]
        fn prop_delimited_payload_survives_any_chunking(
            payload in proptest::collection::vec(any::<u8>(), 0..4096),
            max in 1usize..512,
        ) {
            let (h, got) = receive_all(&mut trickle(wire(&payload), max));
            prop_assert_eq!(h.size_bytes, payload.len() as u64);
            prop_assert_eq!(got, payload);
        }

        #[test]
        fn prop_secure_frame_survives_any_chunking(
            ciphertext in proptest::collection::vec(any::<u8>(), 16..2048),
            max in 1usize..256,
        ) {
            let h = secure_header(ciphertext.len() as u64);
            let msg = frame_secure_message(&h, &ciphertext).unwrap();
            let mut r = trickle(msg, max);
            let (back, _) = read_length_prefixed_header(&mut r).unwrap();
            prop_assert_eq!(read_ciphertext(&mut r, &back).unwrap(), ciphertext);
        }
    }
}
