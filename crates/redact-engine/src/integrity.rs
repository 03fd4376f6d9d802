// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output integrity — SHA-256 fingerprints of rendered pixel buffers.
//
// Two renders of the same image and region list must be byte-identical; the
// fingerprint makes that cheap to check and to show to the user.

use image::RgbaImage;
use redact_core::{RedactError, Result};
use sha2::{Digest, Sha256};

/// SHA-256 over the buffer dimensions and its raw RGBA bytes, as lowercase hex.
pub fn hash_pixels(image: &RgbaImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(image.as_raw());
    hex::encode(hasher.finalize())
}

/// Verify that `image` matches a previously computed fingerprint.
pub fn verify_pixels(image: &RgbaImage, expected_hex: &str) -> Result<()> {
    let actual = hash_pixels(image);
    if actual == expected_hex {
        Ok(())
    } else {
        Err(RedactError::BufferMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn identical_buffers_hash_identically() {
        let a = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let b = a.clone();
        assert_eq!(hash_pixels(&a), hash_pixels(&b));
        assert!(verify_pixels(&b, &hash_pixels(&a)).is_ok());
    }

    #[test]
    fn dimensions_are_part_of_the_fingerprint() {
        // Same bytes, different shape.
        let wide = RgbaImage::from_pixel(4, 1, Rgba([9, 9, 9, 9]));
        let tall = RgbaImage::from_pixel(1, 4, Rgba([9, 9, 9, 9]));
        assert_eq!(wide.as_raw(), tall.as_raw());
        assert_ne!(hash_pixels(&wide), hash_pixels(&tall));
    }

    #[test]
    fn changed_pixel_fails_verification() {
        let a = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let digest = hash_pixels(&a);
        let mut b = a.clone();
        b.put_pixel(1, 1, Rgba([0, 0, 1, 255]));
        assert!(matches!(
            verify_pixels(&b, &digest),
            Err(RedactError::BufferMismatch { .. })
        ));
    }
}
