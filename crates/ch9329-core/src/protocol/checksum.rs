//! Frame checksum: the low byte of the sum of every preceding byte.

/// Sums `bytes` modulo 256.  An empty slice sums to 0.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Returns `true` if the last byte of `frame` is the checksum of the rest.
///
/// An empty frame has no checksum byte and never verifies.
pub fn verify(frame: &[u8]) -> bool {
    match frame.split_last() {
        Some((last, body)) => checksum(body) == *last,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_sums_to_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_sum_wraps_at_256() {
        assert_eq!(checksum(&[0xFF, 0x01]), 0x00);
        assert_eq!(checksum(&[0x80, 0x80, 0x05]), 0x05);
    }

    #[test]
    fn test_keyboard_release_header_sums_to_0x0c() {
        // Arrange: 57 AB 00 02 08 + eight zero bytes
        let mut body = vec![0x57, 0xAB, 0x00, 0x02, 0x08];
        body.extend_from_slice(&[0u8; 8]);

        // Act / Assert
        assert_eq!(checksum(&body), 0x0C);
    }

    #[test]
    fn test_verify_accepts_good_and_rejects_corrupt_frames() {
        let good = [0x57, 0xAB, 0x00, 0x05, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00, 0x0D];
        assert!(verify(&good));

        let mut bad = good;
        bad[6] = 0x01;
        assert!(!verify(&bad));
        assert!(!verify(&[]));
    }
}
