//! Recover images obscured by layered byte-wise transforms and additive masks.
//!
//! An obfuscator took an original RGB image and applied N masking rounds.
//! Each round added a per-pixel mask (recorded, together with a seed offset,
//! in a companion text file) and then transformed every byte of the image
//! with one of five operations: XOR against a noise image, rotate left/right,
//! or shift left/right by an unknown bit count.
//!
//! This crate identifies each round's operation by exhaustive search with a
//! Hamming-distance similarity metric and applies the inverse, undoing the
//! rounds in reverse order until the original image is recovered.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Expects M.bmp, I_M.bmp, I_D.bmp and M0.txt..M2.txt in the directory;
//! // writes the restored image to I_O.bmp.
//! let reports = bitmask_restore::restore(Path::new("challenge"), 3).unwrap();
//! for r in &reports {
//!     println!(
//!         "round {}: {} (score {})",
//!         r.round, r.identification.operation, r.identification.score
//!     );
//! }
//! ```
//!
//! # Identification
//!
//! Each round's mask file records the pre-transform image bytes under an
//! additive mask. After [`mask::recover_mask`] strips the mask, every
//! candidate operation is scored against the transformed image and the best
//! match wins, with XOR probed first and rotations taking priority over
//! shifts on ties. See [`identify::identify`] for the exact policy.
//!
//! Shift rounds are only approximately invertible: bits shifted out of a
//! byte are lost, and the restoration applies the opposite shift as a
//! best-effort inverse.

#![deny(missing_docs)]

pub mod bitops;
pub mod error;
pub mod identify;
pub mod mask;
mod pipeline;
pub mod transform;

pub use error::{Error, Result};
pub use pipeline::{
    load_pixel_buffer, restore, round_file_name, RestorationPipeline, RoundReport, ENCODED_IMAGE,
    MASK_IMAGE, NOISE_IMAGE, RESTORED_IMAGE,
};
