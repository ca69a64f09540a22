//! Exhaustive identification of the byte-wise operation applied in a round.
//!
//! The reversed mask holds the image bytes as they were just before the
//! round's transformation. Every candidate operation is therefore applied to
//! the reversed mask and compared against the transformed target image at the
//! seed offset; the candidate with the lowest aggregate Hamming distance is
//! the round's operation. XOR is the exception: it is probed directly between
//! the target and noise images (see [`transform::similarity_xor`]).
//!
//! The candidate order is load-bearing. XOR is scored first and short-circuits
//! on an exact match, then the rotate/shift families are swept in the fixed
//! priority order ROR, ROL, SHL, SHR with amounts 0..=8. Only a strictly
//! better score replaces the running best, so an earlier family keeps ties.

use crate::bitops::{OpKind, Operation, MAX_AMOUNT};
use crate::error::{Error, Result};
use crate::mask::RGB_CHANNELS;
use crate::transform;

/// Rotate/shift families in tie-break priority order.
const FAMILY_ORDER: [OpKind; 4] = [OpKind::Ror, OpKind::Rol, OpKind::Shl, OpKind::Shr];

/// Outcome of the operation search for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identification {
    /// The most likely operation applied in this round.
    pub operation: Operation,
    /// Aggregate Hamming distance of the winning candidate; 0 is exact.
    pub score: u32,
}

impl Identification {
    /// Whether the winning candidate reproduced the target region exactly.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.score == 0
    }
}

/// Score all 9 amounts of one family against the target region.
///
/// With the `parallel` feature the amounts are scored concurrently; the
/// caller merges the returned scores in amount order, so the tie-break
/// policy is unaffected.
#[cfg(feature = "parallel")]
fn family_scores(kind: OpKind, reversed_mask: &[u8], target: &[u8], seed: usize, count: usize) -> Vec<u32> {
    use rayon::prelude::*;
    (0..=MAX_AMOUNT)
        .into_par_iter()
        .map(|n| transform::similarity(kind, n, reversed_mask, target, seed, count))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn family_scores(kind: OpKind, reversed_mask: &[u8], target: &[u8], seed: usize, count: usize) -> Vec<u32> {
    (0..=MAX_AMOUNT)
        .map(|n| transform::similarity(kind, n, reversed_mask, target, seed, count))
        .collect()
}

/// Identify the operation most likely applied to `target` in this round.
///
/// `reversed_mask` must hold `num_pixels * 3` bytes of pre-transform image
/// data and `seed` is the byte offset of the masked region in `target`.
/// `num_pixels == 0` degenerates to an exact XOR match, since every score
/// over an empty region is trivially zero.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the masked region runs past the end of
/// the target image, and [`Error::InconsistentSize`] if the noise image does
/// not match the target's size or the reversed mask is shorter than the
/// masked region.
pub fn identify(
    target: &[u8],
    noisy: &[u8],
    reversed_mask: &[u8],
    seed: usize,
    num_pixels: usize,
) -> Result<Identification> {
    let count = num_pixels * RGB_CHANNELS;
    if seed + count > target.len() {
        return Err(Error::OutOfRange {
            seed,
            len: count,
            buffer_len: target.len(),
        });
    }
    if noisy.len() != target.len() {
        return Err(Error::InconsistentSize {
            expected: target.len(),
            actual: noisy.len(),
        });
    }
    if reversed_mask.len() < count {
        return Err(Error::InconsistentSize {
            expected: count,
            actual: reversed_mask.len(),
        });
    }

    // XOR baseline; an exact match ends the search before any sweep runs.
    let xor_score = transform::similarity_xor(target, noisy, reversed_mask, seed, count);
    if xor_score == 0 {
        return Ok(Identification {
            operation: Operation::xor(),
            score: 0,
        });
    }

    let mut best = Identification {
        operation: Operation::xor(),
        score: xor_score,
    };

    for kind in FAMILY_ORDER {
        let scores = family_scores(kind, reversed_mask, target, seed, count);
        for (n, &score) in scores.iter().enumerate() {
            let amount = n as u8;
            if score == 0 {
                return Ok(Identification {
                    operation: Operation::new(kind, amount),
                    score: 0,
                });
            }
            if score < best.score {
                best = Identification {
                    operation: Operation::new(kind, amount),
                    score,
                };
            }
        }
    }

    Ok(best)
}
