//! Round-by-round restoration of the obscured image.
//!
//! The obfuscator applied N masking rounds to the original image, each one an
//! additive per-pixel mask (recorded in `M<i>.txt`) followed by a byte-wise
//! transformation of the whole image. Restoration walks the rounds in reverse:
//! for round i from N down to 1 it recovers the round's mask, identifies the
//! transformation that was applied, and applies its inverse to the working
//! image in place. After the last round the working buffer holds the original
//! image and can be exported.
//!
//! Rounds are strictly sequential since each round's output is the next
//! round's input; the only parallelism lives inside the parameter sweep of
//! [`crate::identify`].

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::bitops::OpKind;
use crate::error::{Error, Result};
use crate::identify::{self, Identification};
use crate::mask::{self, RGB_CHANNELS};
use crate::transform;

/// File name of the mask image.
pub const MASK_IMAGE: &str = "M.bmp";
/// File name of the noise image used by XOR rounds.
pub const NOISE_IMAGE: &str = "I_M.bmp";
/// File name of the encoded (obscured) target image.
pub const ENCODED_IMAGE: &str = "I_D.bmp";
/// Default file name of the restored output image.
pub const RESTORED_IMAGE: &str = "I_O.bmp";

/// File name of the mask file for the round with 0-based index `index`.
#[must_use]
pub fn round_file_name(index: u32) -> String {
    format!("M{index}.txt")
}

/// What happened in one restoration round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// 1-based round number, counting down from the total.
    pub round: u32,
    /// Seed offset read from the round's mask file.
    pub seed: u32,
    /// Number of masked pixels in this round.
    pub num_pixels: usize,
    /// The identified operation and its score.
    pub identification: Identification,
}

/// The restoration pipeline holding the three input images.
///
/// Create with [`RestorationPipeline::load`], undo the rounds with
/// [`RestorationPipeline::run`], then write the result with
/// [`RestorationPipeline::export`]. The working buffer is mutated in place
/// across rounds; per-round mask data is transient.
#[derive(Debug)]
pub struct RestorationPipeline {
    dir: PathBuf,
    working: Vec<u8>,
    noisy: Vec<u8>,
    mask_image: Vec<u8>,
    width: u32,
    height: u32,
}

impl RestorationPipeline {
    /// Load the mask, noise, and encoded target images from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if any image fails to load and
    /// [`Error::InconsistentSize`] if the noise and target images do not
    /// have the same dimensions.
    pub fn load(dir: &Path) -> Result<Self> {
        let mask_image = load_pixel_buffer(&dir.join(MASK_IMAGE))?;
        let noisy = load_pixel_buffer(&dir.join(NOISE_IMAGE))?;
        let target = load_pixel_buffer(&dir.join(ENCODED_IMAGE))?;

        if (noisy.0.len(), noisy.1, noisy.2) != (target.0.len(), target.1, target.2) {
            return Err(Error::InconsistentSize {
                expected: target.0.len(),
                actual: noisy.0.len(),
            });
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            working: target.0,
            noisy: noisy.0,
            mask_image: mask_image.0,
            width: target.1,
            height: target.2,
        })
    }

    /// Dimensions of the working image in pixels.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Read-only view of the working pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.working
    }

    /// Undo `rounds` masking rounds, last-applied first.
    ///
    /// Round files are indexed 0-based and consumed in descending order:
    /// `M<rounds-1>.txt` down to `M0.txt`. Returns one [`RoundReport`] per
    /// round in the order they were undone.
    ///
    /// # Errors
    ///
    /// Any failure aborts the remaining rounds and returns [`Error::Round`]
    /// naming the round that failed; the working buffer must then be
    /// considered unusable and nothing should be exported.
    pub fn run(&mut self, rounds: u32) -> Result<Vec<RoundReport>> {
        let mut reports = Vec::with_capacity(rounds as usize);
        for index in (0..rounds).rev() {
            let round = index + 1;
            let report = self
                .run_round(index, round)
                .map_err(|e| e.in_round(round))?;
            reports.push(report);
        }
        Ok(reports)
    }

    fn run_round(&mut self, index: u32, round: u32) -> Result<RoundReport> {
        let fragment = mask::load_mask_file(&self.dir.join(round_file_name(index)))?;
        let num_pixels = fragment.num_pixels();

        // The mask file must describe exactly the mask image, and the masked
        // region must fit inside the working image.
        let reversed = mask::recover_mask(&fragment.values, &self.mask_image)?;
        let total_pixels = (self.width as usize) * (self.height as usize);
        if num_pixels > total_pixels {
            return Err(Error::InconsistentSize {
                expected: total_pixels,
                actual: num_pixels,
            });
        }
        let seed = fragment.seed as usize;
        let count = num_pixels * RGB_CHANNELS;
        if seed + count > self.working.len() {
            return Err(Error::OutOfRange {
                seed,
                len: count,
                buffer_len: self.working.len(),
            });
        }

        let identification =
            identify::identify(&self.working, &self.noisy, &reversed, seed, num_pixels)?;

        let inverse = identification.operation.inverse();
        match inverse.kind {
            OpKind::Xor => transform::apply_xor_in_place(&mut self.working, &self.noisy),
            kind => transform::apply_in_place(&mut self.working, kind, inverse.amount),
        }

        Ok(RoundReport {
            round,
            seed: fragment.seed,
            num_pixels,
            identification,
        })
    }

    /// Write the working buffer as a BMP image to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if encoding or writing fails.
    pub fn export(&self, path: &Path) -> Result<()> {
        let img = RgbImage::from_raw(self.width, self.height, self.working.clone())
            .ok_or(Error::InconsistentSize {
                expected: (self.width as usize) * (self.height as usize) * RGB_CHANNELS,
                actual: self.working.len(),
            })?;
        img.save(path)?;
        Ok(())
    }
}

/// Load an image file as a flat interleaved RGB buffer plus its dimensions.
///
/// # Errors
///
/// Returns [`Error::Load`] carrying the path if the file cannot be decoded.
pub fn load_pixel_buffer(path: &Path) -> Result<(Vec<u8>, u32, u32)> {
    let img = image::open(path)
        .map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok((img.into_raw(), width, height))
}

/// Load, restore, and export in one call.
///
/// Runs the full pipeline against the fixed-name resources in `dir` and
/// writes the restored image to [`RESTORED_IMAGE`] in the same directory.
/// The export only happens when every round succeeded.
///
/// # Errors
///
/// Propagates any load, round, or export failure; on failure no output file
/// is written.
pub fn restore(dir: &Path, rounds: u32) -> Result<Vec<RoundReport>> {
    let mut pipeline = RestorationPipeline::load(dir)?;
    let reports = pipeline.run(rounds)?;
    pipeline.export(&dir.join(RESTORED_IMAGE))?;
    Ok(reports)
}
