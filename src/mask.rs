//! Mask-file parsing and additive mask recovery.
//!
//! Each obfuscation round recorded a companion text file: the first token is
//! the seed (byte offset into the target image where the masked region
//! starts) and every following line holds one masked pixel as three integers.
//! The recorded values are `image[seed + k] + mask_image[k]` in wrapping
//! 8-bit arithmetic, so subtracting the mask image recovers the pre-transform
//! image fragment used to probe which operation was applied.

use std::path::Path;

use crate::error::{Error, Result};

/// Number of interleaved channels per pixel.
pub const RGB_CHANNELS: usize = 3;

/// A parsed per-round mask file: the seed plus one integer per channel of
/// every masked pixel.
#[derive(Debug, Clone)]
pub struct MaskFragment {
    /// Byte offset into the target image where the masked region begins.
    pub seed: u32,
    /// Masked channel values, `RGB_CHANNELS` per pixel.
    pub values: Vec<u32>,
}

impl MaskFragment {
    /// Number of masked pixels described by this fragment.
    #[must_use]
    pub fn num_pixels(&self) -> usize {
        self.values.len() / RGB_CHANNELS
    }
}

/// Parse mask-file text: seed first, then whitespace-separated u32 triplets.
///
/// # Errors
///
/// Returns [`Error::MaskParse`] if the seed is missing, any token is not an
/// unsigned integer, or the trailing values do not form whole triplets. A
/// partial triplet would silently shift every later channel index, so it is
/// rejected rather than dropped.
pub fn parse_mask_text(text: &str, path: &Path) -> Result<MaskFragment> {
    let mut tokens = text.split_whitespace();

    let seed_token = tokens.next().ok_or_else(|| Error::MaskParse {
        path: path.to_path_buf(),
        reason: "empty file, expected a seed".to_string(),
    })?;
    let seed: u32 = seed_token.parse().map_err(|_| Error::MaskParse {
        path: path.to_path_buf(),
        reason: format!("invalid seed '{seed_token}'"),
    })?;

    let mut values = Vec::new();
    for token in tokens {
        let value: u32 = token.parse().map_err(|_| Error::MaskParse {
            path: path.to_path_buf(),
            reason: format!("invalid mask value '{token}'"),
        })?;
        values.push(value);
    }

    if values.len() % RGB_CHANNELS != 0 {
        return Err(Error::MaskParse {
            path: path.to_path_buf(),
            reason: format!(
                "{} values do not form whole RGB triplets",
                values.len()
            ),
        });
    }

    Ok(MaskFragment { seed, values })
}

/// Load and parse a per-round mask file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::MaskParse`]
/// if its content is malformed.
pub fn load_mask_file(path: &Path) -> Result<MaskFragment> {
    let text = std::fs::read_to_string(path)?;
    parse_mask_text(&text, path)
}

/// Reverse the additive masking, recovering the pre-transform image bytes.
///
/// Computes `(mask_values[i] - mask_image[i]) mod 256` for every channel.
///
/// # Errors
///
/// Returns [`Error::InconsistentSize`] if the fragment and the mask image do
/// not describe the same number of channels.
pub fn recover_mask(mask_values: &[u32], mask_image: &[u8]) -> Result<Vec<u8>> {
    if mask_values.len() != mask_image.len() {
        return Err(Error::InconsistentSize {
            expected: mask_values.len(),
            actual: mask_image.len(),
        });
    }

    Ok(mask_values
        .iter()
        .zip(mask_image.iter())
        .map(|(&masked, &mask)| (masked as u8).wrapping_sub(mask))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<MaskFragment> {
        parse_mask_text(text, Path::new("M0.txt"))
    }

    #[test]
    fn parses_seed_and_triplets() {
        let fragment = parse("12\n10 20 30\n40 50 60\n").unwrap();
        assert_eq!(fragment.seed, 12);
        assert_eq!(fragment.values, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(fragment.num_pixels(), 2);
    }

    #[test]
    fn parses_seed_with_no_pixels() {
        let fragment = parse("7\n").unwrap();
        assert_eq!(fragment.seed, 7);
        assert_eq!(fragment.num_pixels(), 0);
    }

    #[test]
    fn rejects_empty_file() {
        assert!(matches!(parse(""), Err(Error::MaskParse { .. })));
    }

    #[test]
    fn rejects_non_integer_tokens() {
        assert!(matches!(parse("x 1 2 3"), Err(Error::MaskParse { .. })));
        assert!(matches!(parse("0 1 two 3"), Err(Error::MaskParse { .. })));
    }

    #[test]
    fn rejects_partial_triplet() {
        let err = parse("0\n1 2 3\n4 5\n").unwrap_err();
        assert!(matches!(err, Error::MaskParse { .. }));
    }

    #[test]
    fn recover_mask_subtracts_with_wrapping() {
        // 300 mod 256 = 44; 44 - 50 wraps to 250.
        let values = vec![300u32, 10, 255];
        let mask = vec![50u8, 10, 254];
        let reversed = recover_mask(&values, &mask).unwrap();
        assert_eq!(reversed, vec![250, 0, 1]);
    }

    #[test]
    fn recover_mask_matches_modular_definition() {
        let values: Vec<u32> = (0..=255).collect();
        let mask: Vec<u8> = (0..=255).rev().collect();
        let reversed = recover_mask(&values, &mask).unwrap();
        for (i, &byte) in reversed.iter().enumerate() {
            let expected = (values[i] as i64 - i64::from(mask[i])).rem_euclid(256);
            assert_eq!(i64::from(byte), expected);
        }
    }

    #[test]
    fn recover_mask_rejects_length_mismatch() {
        let err = recover_mask(&[1, 2, 3], &[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentSize {
                expected: 3,
                actual: 2
            }
        ));
    }
}
