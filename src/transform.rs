//! Whole-buffer transformations and similarity scoring.
//!
//! A pixel buffer is a flat interleaved RGB byte sequence, so every operation
//! here treats it as plain bytes. The two similarity functions score a
//! transformation hypothesis without mutating anything: the result is the sum
//! of per-byte Hamming distances over the compared region, where 0 means an
//! exact match.

use crate::bitops::{self, OpKind};

/// Replace every byte in `buffer` with `kind.apply(byte, n)`.
///
/// Used once per round, after the round's operation has been identified, to
/// undo it across the whole working image.
pub fn apply_in_place(buffer: &mut [u8], kind: OpKind, n: u8) {
    for byte in buffer.iter_mut() {
        *byte = kind.apply(*byte, n);
    }
}

/// XOR `buffer` pairwise with `other`, in place.
///
/// Both buffers must have the same length; the pipeline checks this when it
/// loads the images.
pub fn apply_xor_in_place(buffer: &mut [u8], other: &[u8]) {
    debug_assert_eq!(buffer.len(), other.len());
    for (byte, key) in buffer.iter_mut().zip(other.iter()) {
        *byte = bitops::xor(*byte, *key);
    }
}

/// Score a rotate/shift hypothesis.
///
/// Applies `kind` with amount `n` to each of the first `count` bytes of
/// `source` and accumulates the Hamming distance against `reference`
/// starting at byte `offset`. Callers must ensure `offset + count` fits in
/// `reference` and `count` fits in `source`.
#[must_use]
pub fn similarity(
    kind: OpKind,
    n: u8,
    source: &[u8],
    reference: &[u8],
    offset: usize,
    count: usize,
) -> u32 {
    source[..count]
        .iter()
        .zip(&reference[offset..offset + count])
        .map(|(&s, &r)| bitops::hamming_distance(kind.apply(s, n), r))
        .sum()
}

/// Score the XOR hypothesis.
///
/// Unlike the rotate/shift families, XOR is probed with both operands drawn
/// from the images: each byte of the target region (starting at `offset`) is
/// xored with the corresponding noise byte and compared against the reversed
/// mask.
#[must_use]
pub fn similarity_xor(
    image: &[u8],
    noisy: &[u8],
    reference: &[u8],
    offset: usize,
    count: usize,
) -> u32 {
    image[offset..offset + count]
        .iter()
        .zip(&noisy[offset..offset + count])
        .zip(&reference[..count])
        .map(|((&img, &key), &r)| bitops::hamming_distance(bitops::xor(img, key), r))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitops::rotate_left;

    #[test]
    fn apply_in_place_rotates_every_byte() {
        let mut buf = vec![0b0000_0001, 0b1000_0000, 0xFF, 0x00];
        apply_in_place(&mut buf, OpKind::Rol, 1);
        assert_eq!(buf, vec![0b0000_0010, 0b0000_0001, 0xFF, 0x00]);
    }

    #[test]
    fn apply_xor_in_place_round_trips() {
        let original = vec![1u8, 2, 3, 4, 250, 251];
        let key = vec![0xAAu8, 0x55, 0xFF, 0x00, 0x0F, 0xF0];
        let mut buf = original.clone();
        apply_xor_in_place(&mut buf, &key);
        assert_ne!(buf, original);
        apply_xor_in_place(&mut buf, &key);
        assert_eq!(buf, original);
    }

    #[test]
    fn similarity_is_zero_on_exact_match() {
        let source = vec![0x12u8, 0x34, 0x56];
        let reference: Vec<u8> = source.iter().map(|&b| rotate_left(b, 3)).collect();
        assert_eq!(similarity(OpKind::Rol, 3, &source, &reference, 0, 3), 0);
    }

    #[test]
    fn similarity_counts_differing_bits() {
        let source = vec![0x00u8, 0x00];
        let reference = vec![0x01u8, 0x03];
        // Identity rotation: distances are popcounts of the reference.
        assert_eq!(similarity(OpKind::Ror, 0, &source, &reference, 0, 2), 3);
    }

    #[test]
    fn similarity_respects_offset() {
        let source = vec![0xFFu8];
        let reference = vec![0x00u8, 0x00, 0xFF];
        assert_eq!(similarity(OpKind::Rol, 0, &source, &reference, 2, 1), 0);
        assert_eq!(similarity(OpKind::Rol, 0, &source, &reference, 0, 1), 8);
    }

    #[test]
    fn similarity_xor_matches_masked_region() {
        let image = vec![0u8, 0, 0b1010_0000, 0b0000_1111];
        let noisy = vec![0u8, 0, 0b0101_0000, 0b0000_1111];
        let reference = vec![0b1111_0000u8, 0x00];
        assert_eq!(similarity_xor(&image, &noisy, &reference, 2, 2), 0);
    }

    #[test]
    fn similarity_over_empty_region_is_zero() {
        assert_eq!(similarity(OpKind::Shl, 4, &[], &[], 0, 0), 0);
        assert_eq!(similarity_xor(&[], &[], &[], 0, 0), 0);
    }
}
